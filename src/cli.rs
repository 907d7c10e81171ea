//! Command-line argument parsing
//!
//! Without a subcommand folio starts an interactive session on the persisted
//! document. Subcommands run one operation against it and exit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::export::{ExportMeta, ExportTarget};
use crate::messages::{DocumentMsg, EditMsg, Msg};
use crate::model::AppModel;
use crate::theme::ThemeMode;

/// A paginated rich-text document editor
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "A paginated rich-text document editor")]
pub struct CliArgs {
    /// Snapshot store to use instead of ~/.config/folio/storage.json
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Config file to use instead of ~/.config/folio/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory exports are written to (defaults to the working directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print every page
    Show {
        /// Print rendered text instead of markup
        #[arg(long)]
        text: bool,
    },
    /// Type text at the end of the document
    Type {
        #[arg(required = true)]
        text: String,
    },
    /// Paste markup at the end of the document
    Paste {
        #[arg(required = true)]
        markup: String,
    },
    /// Replace every occurrence of FIND with REPLACE
    Replace { find: String, replace: String },
    /// Discard the document and start over with one empty page
    Reset,
    /// Export a Word-compatible .doc file
    ExportWord(ExportArgs),
    /// Export a PDF through the configured renderer
    ExportPdf(ExportArgs),
    /// Open the document in the system viewer
    Preview(ExportArgs),
    /// Copy the document to the clipboard
    Copy {
        /// Copy markup (with a plain-text fallback)
        #[arg(long)]
        html: bool,
    },
    /// Toggle the theme, or set it explicitly
    Theme { mode: Option<ThemeArg> },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ExportArgs {
    /// Document title (defaults to the configured title)
    #[arg(long)]
    pub title: Option<String>,
    /// Document author (defaults to the configured author)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::Light => ThemeMode::Light,
        }
    }
}

/// What the binary should do
#[derive(Debug, Clone)]
pub enum CliAction {
    Session,
    Show { text: bool },
    WriteConfig { force: bool },
    Dispatch(Vec<Msg>),
}

impl CliArgs {
    /// Resolve the subcommand into messages against the restored model
    pub fn action(&self, model: &AppModel) -> CliAction {
        let Some(command) = &self.command else {
            return CliAction::Session;
        };

        let export = |target: ExportTarget, args: &ExportArgs| {
            let meta = ExportMeta::resolve(
                args.title.as_deref().unwrap_or(""),
                args.author.as_deref().unwrap_or(""),
                &model.config.default_title,
                &model.config.default_author,
            );
            CliAction::Dispatch(vec![Msg::Document(DocumentMsg::Export {
                target,
                meta: Some(meta),
            })])
        };

        match command {
            CliCommand::Show { text } => CliAction::Show { text: *text },
            CliCommand::InitConfig { force } => CliAction::WriteConfig { force: *force },
            CliCommand::Type { text } => CliAction::Dispatch(vec![Msg::insert_text(text.clone())]),
            CliCommand::Paste { markup } => {
                CliAction::Dispatch(vec![Msg::Edit(EditMsg::PasteHtml(markup.clone()))])
            }
            CliCommand::Replace { find, replace } => {
                CliAction::Dispatch(vec![Msg::Document(DocumentMsg::FindReplace(Some((
                    find.clone(),
                    replace.clone(),
                ))))])
            }
            CliCommand::Reset => CliAction::Dispatch(vec![Msg::Document(DocumentMsg::Reset)]),
            CliCommand::ExportWord(args) => export(ExportTarget::Word, args),
            CliCommand::ExportPdf(args) => export(ExportTarget::Pdf, args),
            CliCommand::Preview(args) => export(ExportTarget::Preview, args),
            CliCommand::Copy { html } => CliAction::Dispatch(vec![Msg::Document(if *html {
                DocumentMsg::CopyHtml
            } else {
                DocumentMsg::CopyText
            })]),
            CliCommand::Theme { mode } => {
                let wanted = mode.map(ThemeMode::from).unwrap_or(model.theme.toggled());
                if wanted == model.theme {
                    CliAction::Dispatch(Vec::new())
                } else {
                    CliAction::Dispatch(vec![Msg::Document(DocumentMsg::ToggleTheme)])
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_no_subcommand_starts_session() {
        let args = parse(&["folio"]);
        assert!(matches!(args.action(&AppModel::default()), CliAction::Session));
    }

    #[test]
    fn test_global_store_flag_after_subcommand() {
        let args = parse(&["folio", "show", "--store", "/tmp/s.json"]);
        assert_eq!(args.store, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(args.command, Some(CliCommand::Show { text: false }));
    }

    #[test]
    fn test_export_defaults_fill_blank_metadata() {
        let args = parse(&["folio", "export-word", "--title", "Report"]);
        match args.action(&AppModel::default()) {
            CliAction::Dispatch(msgs) => match &msgs[0] {
                Msg::Document(DocumentMsg::Export {
                    target: ExportTarget::Word,
                    meta: Some(meta),
                }) => {
                    assert_eq!(meta.title, "Report");
                    assert_eq!(meta.author, "Anonymous");
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_theme_set_to_current_is_noop() {
        let args = parse(&["folio", "theme", "light"]);
        match args.action(&AppModel::default()) {
            CliAction::Dispatch(msgs) => assert!(msgs.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_init_config_writes_without_dispatching() {
        let args = parse(&["folio", "init-config", "--force", "--config", "/tmp/folio.yaml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/folio.yaml")));
        assert!(matches!(
            args.action(&AppModel::default()),
            CliAction::WriteConfig { force: true }
        ));
    }

    #[test]
    fn test_replace_requires_both_arguments() {
        assert!(CliArgs::try_parse_from(["folio", "replace", "x"]).is_err());
    }
}
