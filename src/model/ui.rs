//! UI state - status line and user-visible notices

/// Status line text plus a one-shot notice for failures the user must see
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Message displayed in the status line
    pub status_message: String,
    /// Notice shown once (missing PDF renderer, invalid table size, ...)
    pub notice: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Raise a notice; it also becomes the status message
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "notice", "{}", message);
        self.status_message = message.clone();
        self.notice = Some(message);
    }

    /// Hand the pending notice to whoever displays it
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
