//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! This module also holds the registry of `:commands` understood by the
//! interactive session.

use std::path::PathBuf;

use crate::export::{ExportTarget, PdfJob};
use crate::messages::{DocumentMsg, EditMsg, FormatMsg, InsertMsg, Msg};
use crate::model::page::PageId;
use crate::model::selection::EditingContext;
use crate::theme::ThemeMode;

// ============================================================================
// Prompts
// ============================================================================

/// What a prompt's answer is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    LinkUrl,
    ImageUrl,
    TableRows,
    TableColumns { rows: String },
    ExportTitle(ExportTarget),
    ExportAuthor { target: ExportTarget, title: String },
    FindText,
    ReplaceText { find: String },
}

impl PromptPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            PromptPurpose::LinkUrl => "Enter URL",
            PromptPurpose::ImageUrl => "Enter image URL",
            PromptPurpose::TableRows => "Number of rows",
            PromptPurpose::TableColumns { .. } => "Number of columns",
            PromptPurpose::ExportTitle(_) => "Document title",
            PromptPurpose::ExportAuthor { .. } => "Author name",
            PromptPurpose::FindText => "Find",
            PromptPurpose::ReplaceText { .. } => "Replace with",
        }
    }
}

/// A question for the user, carrying the editing context to resume with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub purpose: PromptPurpose,
    pub resume: EditingContext,
}

impl PromptRequest {
    pub fn new(purpose: PromptPurpose, resume: EditingContext) -> Self {
        Self { purpose, resume }
    }

    pub fn label(&self) -> &'static str {
        self.purpose.label()
    }
}

// ============================================================================
// Side effects
// ============================================================================

#[derive(Debug, Clone)]
pub enum Cmd {
    Batch(Vec<Cmd>),

    /// Write the serialised document to the snapshot store
    PersistSnapshot { markup: String },
    /// Remove the stored document
    ClearSnapshot,
    PersistTheme(ThemeMode),

    /// Deliver `AppMsg::ReflowDue(page)` once the current batch has settled
    DeferReflow { page: PageId },

    /// Ask the user; answered with `UiMsg::PromptAnswered`
    Prompt(PromptRequest),
    /// Open the image file picker; answered with `InsertMsg::ImagePicked`
    ShowImagePicker { resume: EditingContext },
    /// Read an image file; answered with `InsertMsg::ImageLoaded`
    ReadImageFile {
        path: PathBuf,
        resume: EditingContext,
    },

    /// Read clipboard text; answered with `AppMsg::ClipboardRead`
    ReadClipboard,
    CopyToClipboard { text: String, html: Option<String> },

    WriteExport {
        target: ExportTarget,
        path: PathBuf,
        body: String,
    },
    RenderPdf { job: PdfJob, output: PathBuf },
    OpenPreview { path: PathBuf, html: String },

    Quit,
}

impl Cmd {
    /// Combine commands; `None` when there is nothing to do
    pub fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Flatten nested batches into execution order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            other => vec![other],
        }
    }
}

// ============================================================================
// Interactive command registry
// ============================================================================

/// Identifies a `:command` of the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Enter,
    Backspace,
    Delete,
    Select,
    SelectAll,
    Page,
    Format,
    ClearFormat,
    Link,
    Image,
    ImageFile,
    Table,
    PageBreak,
    Paste,
    Replace,
    CopyText,
    CopyHtml,
    ExportWord,
    ExportPdf,
    Preview,
    Theme,
    Reset,
    Show,
    Help,
    Quit,
}

/// A command definition for the interactive session
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub id: CommandId,
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Static registry of all session commands
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        id: CommandId::Enter,
        name: "enter",
        usage: ":enter",
        summary: "Split the paragraph at the caret",
    },
    CommandDef {
        id: CommandId::Backspace,
        name: "backspace",
        usage: ":backspace [n]",
        summary: "Delete n characters before the caret",
    },
    CommandDef {
        id: CommandId::Delete,
        name: "delete",
        usage: ":delete",
        summary: "Delete the selection",
    },
    CommandDef {
        id: CommandId::Select,
        name: "select",
        usage: ":select FROM TO",
        summary: "Select a character range on the current page",
    },
    CommandDef {
        id: CommandId::SelectAll,
        name: "selectall",
        usage: ":selectall",
        summary: "Select the whole current page",
    },
    CommandDef {
        id: CommandId::Page,
        name: "page",
        usage: ":page N",
        summary: "Move the caret to the end of page N",
    },
    CommandDef {
        id: CommandId::Format,
        name: "format",
        usage: ":format NAME [VALUE]",
        summary: "Apply a formatting command (bold, italic, justifyCenter, formatBlock h1, ...)",
    },
    CommandDef {
        id: CommandId::ClearFormat,
        name: "clear",
        usage: ":clear",
        summary: "Remove inline formatting from the selection",
    },
    CommandDef {
        id: CommandId::Link,
        name: "link",
        usage: ":link [URL]",
        summary: "Link the selection",
    },
    CommandDef {
        id: CommandId::Image,
        name: "image",
        usage: ":image [URL]",
        summary: "Insert an image by URL",
    },
    CommandDef {
        id: CommandId::ImageFile,
        name: "image-file",
        usage: ":image-file",
        summary: "Insert an image from a local file",
    },
    CommandDef {
        id: CommandId::Table,
        name: "table",
        usage: ":table [ROWS COLS]",
        summary: "Insert a table",
    },
    CommandDef {
        id: CommandId::PageBreak,
        name: "break",
        usage: ":break",
        summary: "Insert a page break",
    },
    CommandDef {
        id: CommandId::Paste,
        name: "paste",
        usage: ":paste [MARKUP]",
        summary: "Paste markup, or the clipboard when no markup is given",
    },
    CommandDef {
        id: CommandId::Replace,
        name: "replace",
        usage: ":replace [FIND REPLACEMENT]",
        summary: "Replace text in every page",
    },
    CommandDef {
        id: CommandId::CopyText,
        name: "copy",
        usage: ":copy",
        summary: "Copy the document as plain text",
    },
    CommandDef {
        id: CommandId::CopyHtml,
        name: "copy-html",
        usage: ":copy-html",
        summary: "Copy the document as HTML",
    },
    CommandDef {
        id: CommandId::ExportWord,
        name: "word",
        usage: ":word",
        summary: "Export a Word document",
    },
    CommandDef {
        id: CommandId::ExportPdf,
        name: "pdf",
        usage: ":pdf",
        summary: "Export a PDF",
    },
    CommandDef {
        id: CommandId::Preview,
        name: "preview",
        usage: ":preview",
        summary: "Open a print preview",
    },
    CommandDef {
        id: CommandId::Theme,
        name: "theme",
        usage: ":theme",
        summary: "Toggle dark/light theme",
    },
    CommandDef {
        id: CommandId::Reset,
        name: "reset",
        usage: ":reset",
        summary: "Discard the document and start a new one",
    },
    CommandDef {
        id: CommandId::Show,
        name: "show",
        usage: ":show",
        summary: "Print the pages",
    },
    CommandDef {
        id: CommandId::Help,
        name: "help",
        usage: ":help",
        summary: "List commands",
    },
    CommandDef {
        id: CommandId::Quit,
        name: "quit",
        usage: ":quit",
        summary: "Leave the session",
    },
];

pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    COMMANDS
        .iter()
        .find(|cmd| cmd.name.eq_ignore_ascii_case(name))
}

/// What a line typed into the session asks for
#[derive(Debug, Clone)]
pub enum LineAction {
    Dispatch(Vec<Msg>),
    Show,
    Help,
    Nothing,
}

/// Parse one session line.
///
/// Lines starting with `:` are commands; anything else is typed at the caret
/// followed by Enter. `::` escapes a leading colon.
pub fn parse_line(line: &str) -> Result<LineAction, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(rest) = line.strip_prefix("::") {
        return Ok(typed(&format!(":{}", rest)));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(typed(line));
    };

    let command = command.trim();
    let (name, args) = match command.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (command, ""),
    };
    if name.is_empty() {
        return Ok(LineAction::Nothing);
    }
    let def = find_command(name).ok_or_else(|| format!("Unknown command :{}", name))?;
    let optional = |args: &str| (!args.is_empty()).then(|| args.to_string());

    let msgs = match def.id {
        CommandId::Show => return Ok(LineAction::Show),
        CommandId::Help => return Ok(LineAction::Help),
        CommandId::Enter => vec![Msg::Edit(EditMsg::InsertParagraph)],
        CommandId::Backspace => {
            let count = if args.is_empty() {
                1
            } else {
                args.parse::<usize>()
                    .map_err(|_| format!("usage: {}", def.usage))?
            };
            (0..count)
                .map(|_| Msg::Edit(EditMsg::DeleteBackward))
                .collect()
        }
        CommandId::Delete => vec![Msg::Edit(EditMsg::DeleteSelection)],
        CommandId::Select => {
            let (from, to) = two_numbers(args).ok_or_else(|| format!("usage: {}", def.usage))?;
            vec![Msg::Edit(EditMsg::SelectRange { from, to })]
        }
        CommandId::SelectAll => vec![Msg::Edit(EditMsg::SelectAllOnPage)],
        CommandId::Page => {
            let n = args
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| format!("usage: {}", def.usage))?;
            vec![Msg::Edit(EditMsg::FocusPage(n - 1))]
        }
        CommandId::Format => {
            let (name, value) = match args.split_once(char::is_whitespace) {
                Some((name, value)) => (name, optional(value.trim())),
                None => (args, None),
            };
            if name.is_empty() {
                return Err(format!("usage: {}", def.usage));
            }
            vec![Msg::Format(FormatMsg::ApplyNamed {
                name: name.to_string(),
                value,
            })]
        }
        CommandId::ClearFormat => vec![Msg::Format(FormatMsg::ClearFormat)],
        CommandId::Link => vec![Msg::Insert(InsertMsg::Link(optional(args)))],
        CommandId::Image => vec![Msg::Insert(InsertMsg::ImageUrl(optional(args)))],
        CommandId::ImageFile => vec![Msg::Insert(InsertMsg::ImageFile)],
        CommandId::Table => {
            let dims = match args.split_whitespace().collect::<Vec<_>>().as_slice() {
                [] => None,
                [rows, cols] => Some((rows.to_string(), cols.to_string())),
                _ => return Err(format!("usage: {}", def.usage)),
            };
            vec![Msg::Insert(InsertMsg::Table(dims))]
        }
        CommandId::PageBreak => vec![Msg::Insert(InsertMsg::PageBreak)],
        CommandId::Paste => match optional(args) {
            Some(markup) => vec![Msg::Edit(EditMsg::PasteHtml(markup))],
            None => vec![Msg::Edit(EditMsg::PasteClipboard)],
        },
        CommandId::Replace => {
            let pair = if args.is_empty() {
                None
            } else {
                let (find, replace) = args
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("usage: {}", def.usage))?;
                Some((find.to_string(), replace.trim_start().to_string()))
            };
            vec![Msg::Document(DocumentMsg::FindReplace(pair))]
        }
        CommandId::CopyText => vec![Msg::Document(DocumentMsg::CopyText)],
        CommandId::CopyHtml => vec![Msg::Document(DocumentMsg::CopyHtml)],
        CommandId::ExportWord => vec![export(ExportTarget::Word)],
        CommandId::ExportPdf => vec![export(ExportTarget::Pdf)],
        CommandId::Preview => vec![export(ExportTarget::Preview)],
        CommandId::Theme => vec![Msg::Document(DocumentMsg::ToggleTheme)],
        CommandId::Reset => vec![Msg::Document(DocumentMsg::Reset)],
        CommandId::Quit => vec![Msg::App(crate::messages::AppMsg::Quit)],
    };

    Ok(LineAction::Dispatch(msgs))
}

fn typed(text: &str) -> LineAction {
    let mut msgs = Vec::new();
    if !text.is_empty() {
        msgs.push(Msg::insert_text(text));
    }
    msgs.push(Msg::Edit(EditMsg::InsertParagraph));
    LineAction::Dispatch(msgs)
}

fn export(target: ExportTarget) -> Msg {
    Msg::Document(DocumentMsg::Export { target, meta: None })
}

fn two_numbers(args: &str) -> Option<(usize, usize)> {
    let mut parts = args.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), None) => Some((a, b)),
        _ => None,
    }
}
