//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::commands::PromptRequest;
use crate::export::{ExportMeta, ExportTarget};
use crate::format::FormatCommand;
use crate::model::page::PageId;
use crate::model::selection::{EditingContext, Selection};

/// Text input on the current page
#[derive(Debug, Clone)]
pub enum EditMsg {
    /// Insert text at the caret, replacing a non-empty selection
    InsertText(String),
    /// Split the content node at the caret (Enter)
    InsertParagraph,
    /// Delete the character before the caret, or the selection (Backspace)
    DeleteBackward,
    /// Delete the selected content
    DeleteSelection,
    /// Insert markup at the caret
    PasteHtml(String),
    /// Insert plain text at the caret; `<` and `&` stay literal
    PasteText(String),
    /// Paste whatever text the system clipboard holds
    PasteClipboard,
    /// Move the caret or selection; focus follows it across pages
    SetSelection(Selection),
    /// Select a flat character range on the current page
    SelectRange { from: usize, to: usize },
    /// Select everything on the current page
    SelectAllOnPage,
    /// Put the caret at the end of the page at this index
    FocusPage(usize),
    /// Capture the live selection before focus is lost
    SaveSelection,
    /// Re-apply the captured selection
    RestoreSelection,
}

/// Formatting commands applied to the selection
#[derive(Debug, Clone)]
pub enum FormatMsg {
    Apply(FormatCommand),
    /// Apply a command by its stable name (`"bold"`, `"formatBlock"`, ...)
    ApplyNamed { name: String, value: Option<String> },
    /// Strip inline formatting from the selection
    ClearFormat,
}

/// Link, image, table and page-break insertion
///
/// Variants carrying `Option` input prompt for it when `None`.
#[derive(Debug, Clone)]
pub enum InsertMsg {
    Link(Option<String>),
    ImageUrl(Option<String>),
    /// Open the local image picker
    ImageFile,
    /// Picker returned (None if cancelled)
    ImagePicked {
        path: Option<PathBuf>,
        resume: EditingContext,
    },
    /// Image file read completed
    ImageLoaded {
        path: PathBuf,
        result: Result<Vec<u8>, String>,
        resume: EditingContext,
    },
    /// Rows and columns as typed by the user
    Table(Option<(String, String)>),
    PageBreak,
}

/// Whole-document operations
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Start over with one empty page
    Reset,
    /// Replace every occurrence of `find` with `replace`
    FindReplace(Option<(String, String)>),
    /// Copy all pages as plain text
    CopyText,
    /// Copy all pages as markup (with a plain-text fallback)
    CopyHtml,
    /// Export; prompts for title and author when `meta` is `None`
    Export {
        target: ExportTarget,
        meta: Option<ExportMeta>,
    },
    ToggleTheme,
}

/// Results coming back from the runtime
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Deferred reflow check after a paste
    ReflowDue(PageId),
    /// Snapshot write completed
    SnapshotSaved(Result<(), String>),
    /// Export file written (or failed)
    ExportFinished {
        target: ExportTarget,
        result: Result<PathBuf, String>,
    },
    /// Clipboard write completed
    CopyFinished(Result<(), String>),
    /// Clipboard text read for pasting
    ClipboardRead(Result<String, String>),
    /// Quit the application
    Quit,
}

/// UI messages (status line, prompts)
#[derive(Debug, Clone)]
pub enum UiMsg {
    SetStatus(String),
    /// Clear the pending notice after it has been shown
    DismissNotice,
    /// A prompt was answered; `None` means the user cancelled it
    PromptAnswered {
        request: PromptRequest,
        answer: Option<String>,
    },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Edit(EditMsg),
    Format(FormatMsg),
    Insert(InsertMsg),
    Document(DocumentMsg),
    App(AppMsg),
    Ui(UiMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn insert_text(text: impl Into<String>) -> Self {
        Msg::Edit(EditMsg::InsertText(text.into()))
    }

    pub fn format(command: FormatCommand) -> Self {
        Msg::Format(FormatMsg::Apply(command))
    }

    pub fn answer(request: PromptRequest, answer: Option<&str>) -> Self {
        Msg::Ui(UiMsg::PromptAnswered {
            request,
            answer: answer.map(str::to_string),
        })
    }
}
