//! Interactive line session
//!
//! Plain lines are typed at the caret; `:command` lines dispatch commands
//! (see `:help`). After every line the status and any pending notice are
//! printed.

use std::io::{BufRead, Write};

use anyhow::Result;

use folio::commands::{parse_line, LineAction, COMMANDS};
use folio::markup::to_html;
use folio::model::AppModel;

use super::app::App;

/// Run until EOF or `:quit`
pub fn run(app: &mut App, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "folio - {} page(s). Type text, or :help for commands.",
        app.model().document.page_count()
    )?;

    let mut line = String::new();
    while !app.should_quit() {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            Ok(LineAction::Dispatch(msgs)) => app.dispatch_all(msgs),
            Ok(LineAction::Show) => write!(out, "{}", render_pages(app.model()))?,
            Ok(LineAction::Help) => write!(out, "{}", help_text())?,
            Ok(LineAction::Nothing) => {}
            Err(e) => writeln!(out, "{}", e)?,
        }

        let model = app.model_mut();
        if let Some(notice) = model.ui.take_notice() {
            writeln!(out, "! {}", notice)?;
        } else if !model.ui.status_message.is_empty() {
            writeln!(out, "{}", model.ui.status_message)?;
            model.ui.status_message.clear();
        }
    }

    Ok(())
}

/// Every page's markup under a header, marking the current page
pub fn render_pages(model: &AppModel) -> String {
    let mut out = String::new();
    let count = model.document.page_count();
    for (i, page) in model.document.pages().iter().enumerate() {
        let marker = if page.id == model.context.current_page {
            " *"
        } else {
            ""
        };
        out.push_str(&format!("--- page {} of {}{} ---\n", i + 1, count, marker));
        let html = to_html(&page.nodes);
        if html.is_empty() {
            out.push_str("(empty)\n");
        } else {
            out.push_str(&html);
            out.push('\n');
        }
    }
    out
}

pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|c| c.usage.len()).max().unwrap_or(0);
    let mut out = String::from("Plain lines are typed as paragraphs. Commands:\n");
    for cmd in COMMANDS {
        out.push_str(&format!("  {:width$}  {}\n", cmd.usage, cmd.summary, width = width));
    }
    out
}
