//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use folio::commands::{Cmd, PromptRequest};
use folio::config::EditorConfig;
use folio::markup::{parse_fragment, to_html};
use folio::measure::PageGeometry;
use folio::messages::{AppMsg, Msg};
use folio::model::{AppModel, Document, Node};
use folio::theme::ThemeMode;
use folio::update::update;

/// 400x100 pages without padding: five one-line paragraphs fill a page
pub fn small_pages() -> EditorConfig {
    EditorConfig {
        page: PageGeometry {
            width: 400.0,
            height: 100.0,
            padding: 0.0,
        },
        ..EditorConfig::default()
    }
}

/// Builds an `AppModel` from per-page markup
#[derive(Debug, Default)]
pub struct ModelBuilder {
    pages: Vec<String>,
    config: Option<EditorConfig>,
    theme: ThemeMode,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, markup: &str) -> Self {
        self.pages.push(markup.to_string());
        self
    }

    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn small_pages(self) -> Self {
        self.config(small_pages())
    }

    pub fn theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> AppModel {
        let document = Document::from_pages(self.pages.iter().map(|m| parse_fragment(m)).collect());
        AppModel::new(document, self.theme, self.config.unwrap_or_default())
            .with_export_dir(std::env::temp_dir())
    }
}

/// `n` one-line paragraphs: `<div>line 0</div><div>line 1</div>...`
pub fn lines(n: usize) -> String {
    (0..n).map(|i| format!("<div>line {}</div>", i)).collect()
}

/// Run one message the way the runtime would, minus I/O.
///
/// Deferred reflows are delivered right after the message; every other
/// command is returned flattened, in order.
pub fn dispatch(model: &mut AppModel, msg: Msg) -> Vec<Cmd> {
    let mut out = Vec::new();
    let mut deferred = Vec::new();
    if let Some(cmd) = update(model, msg) {
        for cmd in cmd.into_vec() {
            match cmd {
                Cmd::DeferReflow { page } => deferred.push(page),
                other => out.push(other),
            }
        }
    }
    for page in deferred {
        out.extend(dispatch(model, Msg::App(AppMsg::ReflowDue(page))));
    }
    out
}

pub fn dispatch_all(model: &mut AppModel, msgs: impl IntoIterator<Item = Msg>) -> Vec<Cmd> {
    msgs.into_iter().flat_map(|msg| dispatch(model, msg)).collect()
}

/// The prompt among `cmds`, if one was opened
pub fn prompt_in(cmds: &[Cmd]) -> Option<PromptRequest> {
    cmds.iter().find_map(|cmd| match cmd {
        Cmd::Prompt(request) => Some(request.clone()),
        _ => None,
    })
}

/// Answer prompts in order, following each answer to the next prompt.
///
/// Returns the commands produced after the last answer.
pub fn answer_prompts(model: &mut AppModel, first: &[Cmd], answers: &[Option<&str>]) -> Vec<Cmd> {
    let mut cmds = first.to_vec();
    for answer in answers {
        let request = prompt_in(&cmds).expect("expected a prompt");
        cmds = dispatch(model, Msg::answer(request, *answer));
    }
    cmds
}

/// The last snapshot persisted among `cmds`
pub fn persisted(cmds: &[Cmd]) -> Option<String> {
    cmds.iter().rev().find_map(|cmd| match cmd {
        Cmd::PersistSnapshot { markup } => Some(markup.clone()),
        _ => None,
    })
}

pub fn page_html(model: &AppModel, index: usize) -> String {
    to_html(&model.document.pages()[index].nodes)
}

/// Every content node in reading order, ignoring pagination
pub fn flattened(model: &AppModel) -> Vec<Node> {
    model.document.all_nodes().into_iter().cloned().collect()
}

pub fn current_index(model: &AppModel) -> usize {
    model
        .document
        .index_of(model.context.current_page)
        .expect("current page is in the document")
}
