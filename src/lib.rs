//! Folio - paginated rich-text document editor
//!
//! Content lives on fixed-size pages. Every edit reflows the touched pages so
//! that overflowing blocks move onto the next page, and the caret follows the
//! content it was in. State changes go through `update`, which returns
//! commands for the runtime to perform.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editing;
pub mod export;
pub mod find;
pub mod format;
pub mod insert;
pub mod markup;
pub mod measure;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod reflow;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::AppModel;
