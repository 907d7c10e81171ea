//! Application model - the complete state of the editor
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod document;
pub mod node;
pub mod page;
pub mod selection;
pub mod tree;
pub mod ui;

pub use document::Document;
pub use node::{Attr, Element, Node};
pub use page::{Page, PageId};
pub use selection::{EditingContext, Position, Selection};
pub use ui::UiState;

use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::persistence::{self, SnapshotStore};
use crate::theme::ThemeMode;

/// The complete application model
#[derive(Debug, Clone)]
pub struct AppModel {
    /// The pages and their content
    pub document: Document,
    /// Current page, live selection and the saved selection
    pub context: EditingContext,
    /// Status line and pending notice
    pub ui: UiState,
    pub theme: ThemeMode,
    /// Persisted editor configuration
    pub config: EditorConfig,
    /// Where exports are written
    pub export_dir: PathBuf,
}

impl AppModel {
    /// Model for a document, with the caret at the end of its last page
    pub fn new(document: Document, theme: ThemeMode, config: EditorConfig) -> Self {
        let last = document.page_or_last(document.last_page_id());
        let mut context = EditingContext::new(last.id);
        context.set_caret(last.end_position());

        Self {
            document,
            context,
            ui: UiState::new(),
            theme,
            config,
            export_dir: std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir()),
        }
    }

    /// Rehydrate from the snapshot store
    pub fn restore(store: &dyn SnapshotStore, config: EditorConfig) -> Self {
        let document = persistence::load_document(store);
        let theme = persistence::load_theme(store);
        let mut model = Self::new(document, theme, config);
        model.ui.set_status(format!(
            "{} page{}",
            model.document.page_count(),
            if model.document.page_count() == 1 { "" } else { "s" }
        ));
        model
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// The page receiving input
    pub fn current_page(&self) -> &Page {
        self.document.page_or_last(self.context.current_page)
    }

    /// Append a fresh page and focus it
    pub fn create_page(&mut self) -> PageId {
        let id = self.document.create_page();
        if let Some(page) = self.document.page(id) {
            self.context.set_caret(page.start_position());
        }
        id
    }

    /// Content width images are scaled down to
    pub fn image_max_width(&self) -> f32 {
        self.config.page.content_width()
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(Document::new(), ThemeMode::default(), EditorConfig::default())
    }
}
