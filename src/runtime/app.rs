//! The application runtime: runs `update` and performs the commands it
//! returns
//!
//! Storage writes, prompts and clipboard access run inline. File reads,
//! exports and PDF rendering run on worker threads and report back over the
//! message channel. Deferred reflows run once everything queued before them
//! has been processed.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use folio::commands::Cmd;
use folio::export::{ExportTarget, PdfRenderer};
use folio::insert::IMAGE_EXTENSIONS;
use folio::messages::{AppMsg, InsertMsg, Msg};
use folio::model::AppModel;
use folio::persistence::{SnapshotStore, DOCUMENT_KEY, THEME_KEY};
use folio::update::update;

use super::prompt::Prompter;

pub struct App {
    model: AppModel,
    store: Box<dyn SnapshotStore>,
    pdf: Arc<dyn PdfRenderer + Send + Sync>,
    prompter: Box<dyn Prompter>,
    queue: VecDeque<Msg>,
    deferred: VecDeque<Msg>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Worker threads that have not reported back yet
    in_flight: usize,
    quit: bool,
}

impl App {
    pub fn new(
        model: AppModel,
        store: Box<dyn SnapshotStore>,
        pdf: Arc<dyn PdfRenderer + Send + Sync>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            store,
            pdf,
            prompter,
            queue: VecDeque::new(),
            deferred: VecDeque::new(),
            msg_tx,
            msg_rx,
            in_flight: 0,
            quit: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Process a message and everything it leads to, including worker
    /// results, before returning
    pub fn dispatch(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        self.pump();
    }

    pub fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) {
        self.queue.extend(msgs);
        self.pump();
    }

    fn pump(&mut self) {
        loop {
            if let Some(msg) = self.queue.pop_front() {
                self.step(msg);
            } else if let Some(msg) = self.deferred.pop_front() {
                self.step(msg);
            } else if self.in_flight > 0 {
                match self.msg_rx.recv() {
                    Ok(msg) => {
                        self.in_flight -= 1;
                        self.queue.push_back(msg);
                    }
                    Err(_) => break,
                }
            } else {
                break;
            }
        }
    }

    fn step(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Run `job` on a worker thread; it must produce exactly one message
    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        let tx = self.msg_tx.clone();
        self.in_flight += 1;
        std::thread::spawn(move || {
            let _ = tx.send(job());
        });
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }

            // =====================================================================
            // Snapshot store
            // =====================================================================
            Cmd::PersistSnapshot { markup } => {
                if let Err(e) = self.store.set(DOCUMENT_KEY, &markup) {
                    tracing::error!("Failed to persist document: {}", e);
                    self.queue
                        .push_back(Msg::App(AppMsg::SnapshotSaved(Err(e.to_string()))));
                }
            }
            Cmd::ClearSnapshot => {
                if let Err(e) = self.store.remove(DOCUMENT_KEY) {
                    tracing::error!("Failed to clear document: {}", e);
                    self.queue
                        .push_back(Msg::App(AppMsg::SnapshotSaved(Err(e.to_string()))));
                }
            }
            Cmd::PersistTheme(theme) => {
                if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
                    tracing::warn!("Failed to persist theme: {}", e);
                }
            }

            Cmd::DeferReflow { page } => {
                self.deferred.push_back(Msg::App(AppMsg::ReflowDue(page)));
            }

            // =====================================================================
            // User input
            // =====================================================================
            Cmd::Prompt(request) => {
                let answer = self.prompter.ask(request.label());
                self.queue.push_back(Msg::Ui(folio::messages::UiMsg::PromptAnswered {
                    request,
                    answer,
                }));
            }

            Cmd::ShowImagePicker { resume } => {
                self.spawn(move || {
                    let path = rfd::FileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file();
                    Msg::Insert(InsertMsg::ImagePicked { path, resume })
                });
            }

            Cmd::ReadImageFile { path, resume } => {
                self.spawn(move || {
                    let result = std::fs::read(&path).map_err(|e| e.to_string());
                    Msg::Insert(InsertMsg::ImageLoaded {
                        path,
                        result,
                        resume,
                    })
                });
            }

            // =====================================================================
            // Clipboard
            // =====================================================================
            Cmd::ReadClipboard => {
                let result = arboard::Clipboard::new()
                    .and_then(|mut clipboard| clipboard.get_text())
                    .map_err(|e| e.to_string());
                self.queue.push_back(Msg::App(AppMsg::ClipboardRead(result)));
            }

            Cmd::CopyToClipboard { text, html } => {
                let result = arboard::Clipboard::new()
                    .and_then(|mut clipboard| match html {
                        Some(html) => clipboard.set_html(html, Some(text)),
                        None => clipboard.set_text(text),
                    })
                    .map_err(|e| e.to_string());
                self.queue.push_back(Msg::App(AppMsg::CopyFinished(result)));
            }

            // =====================================================================
            // Export
            // =====================================================================
            Cmd::WriteExport { target, path, body } => {
                self.spawn(move || {
                    let result = write_file(path, &body);
                    Msg::App(AppMsg::ExportFinished { target, result })
                });
            }

            Cmd::RenderPdf { job, output } => {
                let renderer = Arc::clone(&self.pdf);
                self.spawn(move || {
                    let result = renderer
                        .render(&job, &output)
                        .map(|()| output)
                        .map_err(|e| e.to_string());
                    Msg::App(AppMsg::ExportFinished {
                        target: ExportTarget::Pdf,
                        result,
                    })
                });
            }

            Cmd::OpenPreview { path, html } => {
                self.spawn(move || {
                    let result = write_file(path, &html).and_then(|path| {
                        open::that(&path)
                            .map(|()| path)
                            .map_err(|e| format!("Could not open preview: {}", e))
                    });
                    Msg::App(AppMsg::ExportFinished {
                        target: ExportTarget::Preview,
                        result,
                    })
                });
            }

            Cmd::Quit => self.quit = true,
        }
    }
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Could not create {}: {}", parent.display(), e))?;
    }
    std::fs::write(&path, contents)
        .map(|()| path.clone())
        .map_err(|e| format!("Could not write {}: {}", path.display(), e))
}
