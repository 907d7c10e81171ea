//! Whole-document message handlers (reset, find & replace, copy, export, theme)

use crate::commands::{Cmd, PromptPurpose};
use crate::export::{self, ExportMeta, ExportTarget};
use crate::find::replace_all;
use crate::messages::DocumentMsg;
use crate::model::{AppModel, EditingContext};

use super::{insert, settle_all};

/// Handle document messages
pub fn update_document(model: &mut AppModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::Reset => {
            let page = model.document.reset();
            model.context = EditingContext::new(page);
            if let Some(first) = model.document.page(page) {
                model.context.set_caret(first.start_position());
            }
            model.ui.set_status("New document");
            tracing::info!("document reset");
            Some(Cmd::ClearSnapshot)
        }

        DocumentMsg::FindReplace(None) => Some(insert::prompt(model, PromptPurpose::FindText)),
        DocumentMsg::FindReplace(Some((find, replace))) => find_replace(model, &find, &replace),

        DocumentMsg::CopyText => {
            model.ui.set_status("Copying text...");
            Some(Cmd::CopyToClipboard {
                text: model.document.plain_text(),
                html: None,
            })
        }

        DocumentMsg::CopyHtml => {
            model.ui.set_status("Copying HTML...");
            Some(Cmd::CopyToClipboard {
                text: model.document.plain_text(),
                html: Some(export::page_containers(&model.document)),
            })
        }

        DocumentMsg::Export { target, meta: None } => {
            Some(insert::prompt(model, PromptPurpose::ExportTitle(target)))
        }
        DocumentMsg::Export {
            target,
            meta: Some(meta),
        } => export(model, target, meta),

        DocumentMsg::ToggleTheme => {
            model.theme = model.theme.toggled();
            model
                .ui
                .set_status(format!("Theme: {}", model.theme.as_str()));
            Some(Cmd::PersistTheme(model.theme))
        }
    }
}

/// Replace across all pages, then reflow everything since replacements can
/// grow content
pub(super) fn find_replace(model: &mut AppModel, find: &str, replace: &str) -> Option<Cmd> {
    if find.is_empty() {
        model.ui.set_status("Nothing to find");
        return None;
    }

    let report = replace_all(&mut model.document, find, replace);
    if report.replacements == 0 {
        model.ui.set_status(format!("No matches for '{}'", find));
        return None;
    }

    let cmd = settle_all(model);
    model.ui.set_status(format!(
        "Replaced {} occurrence{} on {} page{}",
        report.replacements,
        if report.replacements == 1 { "" } else { "s" },
        report.pages_touched.len(),
        if report.pages_touched.len() == 1 { "" } else { "s" },
    ));
    Some(cmd)
}

/// Build the export for `target` and hand it to the runtime
pub(super) fn export(model: &mut AppModel, target: ExportTarget, meta: ExportMeta) -> Option<Cmd> {
    tracing::info!(kind = target.label(), title = %meta.title, "exporting");
    model
        .ui
        .set_status(format!("Exporting {} \"{}\"...", target.label(), meta.title));

    let cmd = match target {
        ExportTarget::Word => {
            let artifact = export::word_document(&model.document, &meta);
            Cmd::WriteExport {
                target,
                path: model.export_dir.join(&artifact.file_name),
                body: artifact.body,
            }
        }
        ExportTarget::Pdf => {
            let job = export::pdf_job(&model.document, &meta);
            let output = model.export_dir.join(&job.file_name);
            Cmd::RenderPdf { job, output }
        }
        ExportTarget::Preview => {
            let html =
                export::preview_html(&model.document, &meta, &model.config.page, model.theme);
            let path = std::env::temp_dir().join(format!("{}-preview.html", meta.file_stem()));
            Cmd::OpenPreview { path, html }
        }
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::EditMsg;
    use crate::theme::ThemeMode;
    use crate::update::update_edit;

    #[test]
    fn test_reset_clears_snapshot() {
        let mut model = AppModel::default();
        update_edit(&mut model, EditMsg::InsertText("draft".into()));
        let cmd = update_document(&mut model, DocumentMsg::Reset);
        assert!(matches!(cmd, Some(Cmd::ClearSnapshot)));
        assert_eq!(model.document.page_count(), 1);
        assert!(model.document.is_blank());
        assert_eq!(model.context.current_page, model.document.first_page_id());
    }

    #[test]
    fn test_replace_reports_count() {
        let mut model = AppModel::default();
        update_edit(&mut model, EditMsg::InsertText("a cat and a cat".into()));
        let cmd = find_replace(&mut model, "cat", "dog");
        assert!(matches!(cmd, Some(Cmd::PersistSnapshot { .. })));
        assert!(model.ui.status_message.starts_with("Replaced 2 occurrences"));
        assert_eq!(model.document.plain_text(), "a dog and a dog");
    }

    #[test]
    fn test_replace_without_match_changes_nothing() {
        let mut model = AppModel::default();
        update_edit(&mut model, EditMsg::InsertText("text".into()));
        assert!(find_replace(&mut model, "zzz", "y").is_none());
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut model = AppModel::default();
        let cmd = update_document(&mut model, DocumentMsg::ToggleTheme);
        assert!(matches!(cmd, Some(Cmd::PersistTheme(ThemeMode::Dark))));
    }

    #[test]
    fn test_pdf_export_goes_to_export_dir() {
        let mut model = AppModel::default().with_export_dir("/tmp/exports");
        let meta = ExportMeta::resolve("Report", "J. Doe", "t", "a");
        match export(&mut model, ExportTarget::Pdf, meta) {
            Some(Cmd::RenderPdf { job, output }) => {
                assert_eq!(job.title, "Report");
                assert!(output.ends_with("Report.pdf"));
            }
            other => panic!("expected pdf job, got {:?}", other),
        }
    }
}
