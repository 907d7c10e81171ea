//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! pagination, caret placement and state transition issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=reflow=debug,pages=debug` - scoped filtering
//! - `RUST_LOG=folio::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/folio/logs/folio.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::AppModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. Console logs go
/// to stderr so they never mix with document output on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of pagination and caret state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub page_count: usize,
    pub current_page: u64,
    /// Content node count per page
    pub nodes_per_page: Vec<usize>,
    /// `(page, node, offset)` of the caret
    pub caret: Option<(u64, usize, usize)>,
    pub selection_empty: bool,
}

impl PageSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        let selection = model.context.selection;
        Self {
            page_count: model.document.page_count(),
            current_page: model.context.current_page.0,
            nodes_per_page: model
                .document
                .pages()
                .iter()
                .map(|p| p.nodes.len())
                .collect(),
            caret: selection.map(|s| (s.head.page.0, s.head.node, s.head.offset)),
            selection_empty: selection.map(|s| s.is_collapsed()).unwrap_or(true),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &PageSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.page_count != other.page_count {
            changes.push(format!(
                "page count: {} → {}",
                self.page_count, other.page_count
            ));
        } else if self.nodes_per_page != other.nodes_per_page {
            changes.push(format!(
                "nodes: {:?} → {:?}",
                self.nodes_per_page, other.nodes_per_page
            ));
        }

        if self.current_page != other.current_page {
            changes.push(format!(
                "current page: {} → {}",
                self.current_page, other.current_page
            ));
        }

        if self.caret != other.caret {
            changes.push(format!("caret: {:?} → {:?}", self.caret, other.caret));
        }

        if self.selection_empty != other.selection_empty {
            let status = if other.selection_empty {
                "cleared"
            } else {
                "active"
            };
            changes.push(format!("selection {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
