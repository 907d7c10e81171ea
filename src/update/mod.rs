//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod document;
mod edit;
mod format;
mod insert;
mod ui;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::{AppModel, PageId};
use crate::persistence::encode_document;
use crate::reflow::{self, ReflowOutcome};

#[cfg(debug_assertions)]
use crate::tracing::PageSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use document::update_document;
pub use edit::update_edit;
pub use format::update_format;
pub use insert::update_insert;
pub use ui::update_ui;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Edit(m) => edit::update_edit(model, m),
        Msg::Format(m) => format::update_format(model, m),
        Msg::Insert(m) => insert::update_insert(model, m),
        Msg::Document(m) => document::update_document(model, m),
        Msg::App(m) => app::update_app(model, m),
        Msg::Ui(m) => ui::update_ui(model, m),
    }
}

/// Reflow the pages a mutation touched, then persist the document.
///
/// `None` when nothing was touched.
pub(crate) fn settle(model: &mut AppModel, touched: &[PageId]) -> Option<Cmd> {
    if touched.is_empty() {
        return None;
    }

    let mut outcome = ReflowOutcome::default();
    let mut seen: Vec<PageId> = Vec::with_capacity(touched.len());
    for &page in touched {
        if seen.contains(&page) || !model.document.contains(page) {
            continue;
        }
        seen.push(page);
        outcome.absorb(reflow::reflow_page(
            &mut model.document,
            &mut model.context,
            page,
            &model.config.metrics,
            &model.config.page,
        ));
    }
    report_reflow(model, &outcome);

    Some(persist(model))
}

/// Reflow every page (after document-wide edits), then persist
pub(crate) fn settle_all(model: &mut AppModel) -> Cmd {
    let outcome = reflow::reflow_all(
        &mut model.document,
        &mut model.context,
        &model.config.metrics,
        &model.config.page,
    );
    report_reflow(model, &outcome);
    persist(model)
}

pub(crate) fn persist(model: &AppModel) -> Cmd {
    Cmd::PersistSnapshot {
        markup: encode_document(&model.document),
    }
}

fn report_reflow(model: &mut AppModel, outcome: &ReflowOutcome) {
    if outcome.is_noop() {
        return;
    }
    let page = model
        .document
        .index_of(model.context.current_page)
        .map(|i| i + 1)
        .unwrap_or_else(|| model.document.page_count());
    model.ui.set_status(format!(
        "Page {} of {}",
        page,
        model.document.page_count()
    ));
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after page state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = PageSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = PageSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "pages", %diff, "state changed");
    }

    debug_assert!(
        model.document.page_count() >= 1,
        "[{}] document lost its last page",
        msg_name
    );
    debug_assert!(
        model.document.contains(model.context.current_page),
        "[{}] current page {:?} is not in the document",
        msg_name,
        model.context.current_page
    );

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Edit::InsertText("x")`
/// - `Insert::PageBreak`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::Format(m) => format!("Format::{:?}", m),
        Msg::Insert(crate::messages::InsertMsg::ImageLoaded { path, .. }) => {
            format!("Insert::ImageLoaded({})", path.display())
        }
        Msg::Insert(m) => format!("Insert::{:?}", m),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
        Msg::Ui(m) => format!("Ui::{:?}", m),
    }
}
