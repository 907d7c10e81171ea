use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use folio::cli::{CliAction, CliArgs};
use folio::config::EditorConfig;
use folio::export::ExternalPdfRenderer;
use folio::model::AppModel;
use folio::persistence::{FileStore, SnapshotStore};

mod runtime;

use runtime::prompt::{Prompter, ScriptedPrompter, StdinPrompter};
use runtime::session;
use runtime::App;

fn main() -> Result<()> {
    folio::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    };

    let store = match &args.store {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default().context("Could not open the snapshot store")?,
    };
    tracing::info!("Using snapshot store {}", store.path().display());

    let mut model = AppModel::restore(&store, config.clone());
    if let Some(dir) = &args.out_dir {
        model = model.with_export_dir(dir);
    }

    let action = args.action(&model);
    let prompter: Box<dyn Prompter> = match action {
        CliAction::Session => Box::new(StdinPrompter),
        // One-shot commands carry everything they need; any prompt is cancelled
        _ => Box::new(ScriptedPrompter::new(Vec::<Option<String>>::new())),
    };

    let store: Box<dyn SnapshotStore> = Box::new(store);
    let pdf = Arc::new(ExternalPdfRenderer::new(config.pdf_renderer.clone()));
    let mut app = App::new(model, store, pdf, prompter);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match action {
        CliAction::Session => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            session::run(&mut app, &mut input as &mut dyn BufRead, &mut out)?;
        }
        CliAction::Show { text } => {
            if text {
                writeln!(out, "{}", app.model().document.plain_text())?;
            } else {
                write!(out, "{}", session::render_pages(app.model()))?;
            }
        }
        CliAction::WriteConfig { force } => {
            let path = match &args.config {
                Some(path) => path.clone(),
                None => folio::config_paths::config_file()
                    .context("No config directory available")?,
            };
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            match &args.config {
                Some(path) => config.save_to(path),
                None => config.save(),
            }
            .map_err(anyhow::Error::msg)?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        CliAction::Dispatch(msgs) => {
            app.dispatch_all(msgs);
            let model = app.model_mut();
            if let Some(notice) = model.ui.take_notice() {
                anyhow::bail!("{}", notice);
            }
            if !model.ui.status_message.is_empty() {
                writeln!(out, "{}", model.ui.status_message)?;
            }
        }
    }

    Ok(())
}
