//! Insertion message handlers (links, images, tables, page breaks)
//!
//! Every path that waits on the user or on a file read saves the selection
//! first and carries the editing context in the command; the continuation
//! resumes from that context right before inserting.

use crate::commands::{Cmd, PromptPurpose, PromptRequest};
use crate::editing;
use crate::format::FormatCommand;
use crate::insert::{
    self, image_fragment, normalize_url, parse_dimension, table_fragment, UrlError, UrlTarget,
};
use crate::messages::InsertMsg;
use crate::model::{AppModel, EditingContext};

use super::settle;

/// Handle insertion messages
pub fn update_insert(model: &mut AppModel, msg: InsertMsg) -> Option<Cmd> {
    match msg {
        InsertMsg::Link(None) => Some(prompt(model, PromptPurpose::LinkUrl)),
        InsertMsg::Link(Some(url)) => insert_link(model, &url),

        InsertMsg::ImageUrl(None) => Some(prompt(model, PromptPurpose::ImageUrl)),
        InsertMsg::ImageUrl(Some(url)) => insert_image_url(model, &url),

        InsertMsg::ImageFile => {
            model.context.save();
            Some(Cmd::ShowImagePicker {
                resume: model.context,
            })
        }

        InsertMsg::ImagePicked { path: None, .. } => {
            model.ui.set_status("No image selected");
            None
        }

        InsertMsg::ImagePicked {
            path: Some(path),
            resume,
        } => {
            model.ui.set_status(format!("Reading {}", path.display()));
            Some(Cmd::ReadImageFile { path, resume })
        }

        InsertMsg::ImageLoaded {
            path,
            result,
            resume,
        } => match result {
            Ok(bytes) => {
                resume_context(model, resume);
                let node = insert::image_from_bytes(&path, &bytes, model.image_max_width());
                let touched =
                    editing::insert_inline(&mut model.document, &mut model.context, vec![node]);
                tracing::info!(path = %path.display(), bytes = bytes.len(), "embedded image");
                settle(model, touched.as_slice())
            }
            Err(e) => {
                model
                    .ui
                    .notify(format!("Could not read {}: {}", path.display(), e));
                None
            }
        },

        InsertMsg::Table(None) => Some(prompt(model, PromptPurpose::TableRows)),
        InsertMsg::Table(Some((rows, cols))) => insert_table(model, &rows, &cols),

        InsertMsg::PageBreak => {
            let touched = editing::insert_fragment(
                &mut model.document,
                &mut model.context,
                vec![insert::page_break()],
            );
            settle(model, touched.as_slice())
        }
    }
}

/// Save the selection and ask the user
pub(super) fn prompt(model: &mut AppModel, purpose: PromptPurpose) -> Cmd {
    model.context.save();
    Cmd::Prompt(PromptRequest::new(purpose, model.context))
}

/// Continue with the context captured before a prompt or file read.
///
/// A context whose page has since disappeared (the document was reset) is
/// dropped and input goes to the current page instead.
pub(super) fn resume_context(model: &mut AppModel, resume: EditingContext) {
    if model.document.contains(resume.current_page) {
        model.context = resume;
        model.context.restore();
    } else {
        tracing::debug!(page = resume.current_page.0, "resume context is stale");
    }
}

pub(super) fn insert_link(model: &mut AppModel, url: &str) -> Option<Cmd> {
    let url = match normalize_url(url, UrlTarget::Link) {
        Ok(url) => url,
        Err(UrlError::Empty) => {
            model.ui.set_status("Link cancelled");
            return None;
        }
        Err(e) => {
            model.ui.notify(format!("Invalid link: {}", e));
            return None;
        }
    };
    let touched = FormatCommand::CreateLink(url).apply(&mut model.document, &mut model.context);
    settle(model, &touched)
}

pub(super) fn insert_image_url(model: &mut AppModel, url: &str) -> Option<Cmd> {
    let url = match normalize_url(url, UrlTarget::Image) {
        Ok(url) => url,
        Err(UrlError::Empty) => {
            model.ui.set_status("Image cancelled");
            return None;
        }
        Err(e) => {
            model.ui.notify(format!("Invalid image URL: {}", e));
            return None;
        }
    };
    let node = image_fragment(&url, "", None, model.image_max_width());
    let touched = editing::insert_inline(&mut model.document, &mut model.context, vec![node]);
    settle(model, touched.as_slice())
}

/// Validate the typed dimensions and insert the table; invalid input only
/// raises a notice
pub(super) fn insert_table(model: &mut AppModel, rows: &str, cols: &str) -> Option<Cmd> {
    let max = model.config.max_table_dimension;
    let rows = match parse_dimension(rows, max) {
        Ok(rows) => rows,
        Err(e) => {
            model.ui.notify(format!("Invalid row count: {}", e));
            return None;
        }
    };
    let cols = match parse_dimension(cols, max) {
        Ok(cols) => cols,
        Err(e) => {
            model.ui.notify(format!("Invalid column count: {}", e));
            return None;
        }
    };

    let touched = editing::insert_fragment(
        &mut model.document,
        &mut model.context,
        vec![table_fragment(rows, cols)],
    );
    model.ui.set_status(format!("Inserted {}x{} table", rows, cols));
    settle(model, touched.as_slice())
}
