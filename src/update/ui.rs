//! UI message handlers (status line, notices, prompt answers)

use crate::commands::{Cmd, PromptPurpose, PromptRequest};
use crate::export::ExportMeta;
use crate::messages::UiMsg;
use crate::model::AppModel;

use super::{document, insert};

/// Handle UI messages
pub fn update_ui(model: &mut AppModel, msg: UiMsg) -> Option<Cmd> {
    match msg {
        UiMsg::SetStatus(message) => {
            model.ui.set_status(message);
            None
        }

        UiMsg::DismissNotice => {
            model.ui.notice = None;
            None
        }

        UiMsg::PromptAnswered { request, answer } => prompt_answered(model, request, answer),
    }
}

/// Continue the operation a prompt was opened for.
///
/// A cancelled prompt (`None`) ends the operation without touching the
/// document.
fn prompt_answered(
    model: &mut AppModel,
    request: PromptRequest,
    answer: Option<String>,
) -> Option<Cmd> {
    let PromptRequest { purpose, resume } = request;

    let Some(answer) = answer else {
        return match purpose {
            // Cancelling the author prompt keeps the default author
            PromptPurpose::ExportAuthor { target, title } => {
                let meta = resolve_meta(model, &title, "");
                document::export(model, target, meta)
            }
            other => {
                tracing::debug!(purpose = ?other, "prompt cancelled");
                model.ui.set_status("Cancelled");
                None
            }
        };
    };

    match purpose {
        PromptPurpose::LinkUrl => {
            insert::resume_context(model, resume);
            insert::insert_link(model, &answer)
        }
        PromptPurpose::ImageUrl => {
            insert::resume_context(model, resume);
            insert::insert_image_url(model, &answer)
        }
        PromptPurpose::TableRows => Some(Cmd::Prompt(PromptRequest::new(
            PromptPurpose::TableColumns { rows: answer },
            resume,
        ))),
        PromptPurpose::TableColumns { rows } => {
            insert::resume_context(model, resume);
            insert::insert_table(model, &rows, &answer)
        }
        PromptPurpose::ExportTitle(target) => Some(Cmd::Prompt(PromptRequest::new(
            PromptPurpose::ExportAuthor {
                target,
                title: answer,
            },
            resume,
        ))),
        PromptPurpose::ExportAuthor { target, title } => {
            let meta = resolve_meta(model, &title, &answer);
            document::export(model, target, meta)
        }
        PromptPurpose::FindText if answer.is_empty() => {
            model.ui.set_status("Nothing to find");
            None
        }
        PromptPurpose::FindText => Some(Cmd::Prompt(PromptRequest::new(
            PromptPurpose::ReplaceText { find: answer },
            resume,
        ))),
        PromptPurpose::ReplaceText { find } => {
            insert::resume_context(model, resume);
            document::find_replace(model, &find, &answer)
        }
    }
}

fn resolve_meta(model: &AppModel, title: &str, author: &str) -> ExportMeta {
    ExportMeta::resolve(
        title,
        author,
        &model.config.default_title,
        &model.config.default_author,
    )
}
