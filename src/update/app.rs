//! App message handlers (results coming back from the runtime)

use crate::commands::Cmd;
use crate::messages::{AppMsg, EditMsg};
use crate::model::AppModel;

use super::{edit, settle};

/// Handle app messages
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::ReflowDue(page) => {
            if !model.document.contains(page) {
                tracing::debug!(page = page.0, "deferred reflow for a page that is gone");
                return None;
            }
            settle(model, &[page])
        }

        AppMsg::SnapshotSaved(Ok(())) => None,
        AppMsg::SnapshotSaved(Err(e)) => {
            model.ui.notify(format!("Could not save document: {}", e));
            None
        }

        AppMsg::ExportFinished { target, result } => {
            match result {
                Ok(path) => model.ui.set_status(format!(
                    "Exported {} to {}",
                    target.label(),
                    path.display()
                )),
                Err(e) => model.ui.notify(e),
            }
            None
        }

        AppMsg::CopyFinished(Ok(())) => {
            model.ui.set_status("Copied to clipboard");
            None
        }
        AppMsg::CopyFinished(Err(e)) => {
            model.ui.notify(format!("Clipboard error: {}", e));
            None
        }

        AppMsg::ClipboardRead(Ok(text)) => edit::update_edit(model, EditMsg::PasteText(text)),
        AppMsg::ClipboardRead(Err(e)) => {
            model.ui.notify(format!("Clipboard error: {}", e));
            None
        }

        AppMsg::Quit => Some(Cmd::Quit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportTarget;
    use crate::model::PageId;

    #[test]
    fn test_reflow_due_persists() {
        let mut model = AppModel::default();
        let page = model.context.current_page;
        assert!(matches!(
            update_app(&mut model, AppMsg::ReflowDue(page)),
            Some(Cmd::PersistSnapshot { .. })
        ));
        assert!(update_app(&mut model, AppMsg::ReflowDue(PageId(999))).is_none());
    }

    #[test]
    fn test_failed_export_raises_notice() {
        let mut model = AppModel::default();
        update_app(
            &mut model,
            AppMsg::ExportFinished {
                target: ExportTarget::Pdf,
                result: Err("PDF renderer is not available".into()),
            },
        );
        assert_eq!(
            model.ui.take_notice().as_deref(),
            Some("PDF renderer is not available")
        );
    }
}
