//! Prompt answering for the terminal session and for scripted runs

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Typing this at a prompt cancels it
pub const CANCEL: &str = ":cancel";

/// Answers a prompt; `None` means the user cancelled
pub trait Prompter {
    fn ask(&mut self, label: &str) -> Option<String>;
}

/// Reads answers from stdin; EOF or `:cancel` cancels
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, label: &str) -> Option<String> {
        print!("{} ({} to cancel): ", label, CANCEL);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim_end_matches(['\r', '\n']);
                (answer.trim() != CANCEL).then(|| answer.to_string())
            }
        }
    }
}

/// Pre-recorded answers, used by one-shot CLI commands and tests.
///
/// Once the answers run out every prompt is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str) -> Option<String> {
        let answer = self.answers.pop_front().flatten();
        tracing::debug!(label, ?answer, "scripted prompt");
        answer
    }
}
