//! Runtime module - command execution and the terminal front end
//!
//! - `app` - runs `update` and performs the commands it returns
//! - `prompt` - prompt answering (stdin or scripted)
//! - `session` - the interactive line session

pub mod app;
pub mod prompt;
pub mod session;

pub use app::App;
