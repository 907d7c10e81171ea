//! Edit message handlers (typing, deleting, pasting, moving the selection)

use crate::commands::Cmd;
use crate::editing;
use crate::markup::parse_fragment;
use crate::messages::EditMsg;
use crate::model::{AppModel, Selection};

use super::settle;

/// Handle edit messages
pub fn update_edit(model: &mut AppModel, msg: EditMsg) -> Option<Cmd> {
    match msg {
        EditMsg::InsertText(text) => {
            let touched = editing::insert_text(&mut model.document, &mut model.context, &text);
            settle(model, touched.as_slice())
        }

        EditMsg::InsertParagraph => {
            let touched = editing::insert_paragraph(&mut model.document, &mut model.context);
            settle(model, touched.as_slice())
        }

        EditMsg::DeleteBackward => {
            let touched = editing::delete_backward(&mut model.document, &mut model.context);
            settle(model, touched.as_slice())
        }

        EditMsg::DeleteSelection => {
            let touched = editing::delete_selection(&mut model.document, &mut model.context);
            settle(model, touched.as_slice())
        }

        EditMsg::PasteHtml(content) => {
            let nodes = parse_fragment(&content);
            let touched = editing::insert_fragment(&mut model.document, &mut model.context, nodes);
            // The overflow check runs once the paste has fully landed
            touched.map(|page| Cmd::DeferReflow { page })
        }

        EditMsg::PasteText(content) => {
            let touched = editing::insert_text(&mut model.document, &mut model.context, &content);
            touched.map(|page| Cmd::DeferReflow { page })
        }

        EditMsg::PasteClipboard => Some(Cmd::ReadClipboard),

        EditMsg::SetSelection(selection) => {
            if !editing::set_selection(&model.document, &mut model.context, selection) {
                tracing::debug!(?selection, "selection points outside the document");
            }
            None
        }

        EditMsg::SelectRange { from, to } => {
            let page = model.current_page();
            let len = page.len();
            let (start, end) = (from.min(to).min(len), from.max(to).min(len));
            let selection = if start == end {
                Selection::collapsed(page.position_at(start))
            } else {
                Selection::new(page.position_after(start), page.position_at(end))
            };
            model.context.set_selection(selection);
            None
        }

        EditMsg::SelectAllOnPage => {
            editing::select_all_on_page(&model.document, &mut model.context);
            None
        }

        EditMsg::FocusPage(index) => {
            match model.document.page_id_at(index) {
                Some(id) => {
                    let end = model.document.page_or_last(id).end_position();
                    model.context.set_caret(end);
                    model.ui.set_status(format!(
                        "Page {} of {}",
                        index + 1,
                        model.document.page_count()
                    ));
                }
                None => model.ui.notify(format!(
                    "No page {} (document has {})",
                    index + 1,
                    model.document.page_count()
                )),
            }
            None
        }

        EditMsg::SaveSelection => {
            model.context.save();
            None
        }

        EditMsg::RestoreSelection => {
            model.context.restore();
            None
        }
    }
}
