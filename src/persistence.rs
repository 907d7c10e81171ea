//! Persisted snapshot of the document and the theme preference
//!
//! The document is stored as markup: every page's content wrapped in a
//! `<div class="page">` container, in reading order. Stores are simple string
//! key/value maps so the same codec works against memory (tests) and a JSON
//! file under the config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::page_containers;
use crate::markup::parse_fragment;
use crate::model::document::Document;
use crate::model::node::Node;
use crate::theme::ThemeMode;

/// Key holding the document markup
pub const DOCUMENT_KEY: &str = "folio.document";

/// Key holding `"dark"` or `"light"`
pub const THEME_KEY: &str = "folio.theme";

/// A durable string key/value store
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()>;
    fn remove(&mut self, key: &str) -> std::io::Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// On-disk layout of [`FileStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version for forward compatibility
    #[serde(default)]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Store backed by a single JSON file, rewritten on every change
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    data: StoreFile,
}

impl FileStore {
    const CURRENT_VERSION: u32 = 1;

    /// Open the store at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store at {}: {}", path.display(), e);
                StoreFile::default()
            }),
            Err(_) => StoreFile::default(),
        };
        Self { path, data }
    }

    /// Open `~/.config/folio/storage.json`
    pub fn open_default() -> std::io::Result<Self> {
        let Some(path) = crate::config_paths::storage_file() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory available",
            ));
        };
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.data.version = Self::CURRENT_VERSION;
        let contents = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.data.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        if self.data.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Serialise the whole document
pub fn encode_document(doc: &Document) -> String {
    page_containers(doc)
}

/// Rebuild a document from stored markup.
///
/// Content outside page containers becomes a page of its own; markup with no
/// content at all yields a single fresh page.
pub fn decode_document(markup: &str) -> Document {
    let mut pages: Vec<Vec<Node>> = Vec::new();
    let mut loose: Vec<Node> = Vec::new();

    for node in parse_fragment(markup) {
        match node {
            Node::Element(el) if el.tag == "div" && el.has_class("page") => {
                if !loose.is_empty() {
                    pages.push(std::mem::take(&mut loose));
                }
                pages.push(el.children);
            }
            Node::Text(text) if text.trim().is_empty() => {}
            other => loose.push(other),
        }
    }
    if !loose.is_empty() {
        pages.push(loose);
    }

    Document::from_pages(pages)
}

/// Rehydrate the document at startup
pub fn load_document(store: &dyn SnapshotStore) -> Document {
    match store.get(DOCUMENT_KEY) {
        Some(markup) if !markup.trim().is_empty() => {
            let doc = decode_document(&markup);
            tracing::info!(pages = doc.page_count(), "restored document snapshot");
            doc
        }
        _ => {
            tracing::debug!("no document snapshot, starting with an empty page");
            Document::new()
        }
    }
}

pub fn load_theme(store: &dyn SnapshotStore) -> ThemeMode {
    store
        .get(THEME_KEY)
        .and_then(|v| ThemeMode::parse(&v))
        .unwrap_or_default()
}
