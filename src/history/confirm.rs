//! Confirmation of players seen for the first time

use crate::error::EloError;
use crate::types::PlayerId;
use anyhow::Context;
use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};
use std::sync::Mutex;

/// Asked before a new player is added to a competition
pub trait Confirmation: Send + Sync {
    /// Whether `player` should be created
    fn confirm(&self, player: &PlayerId) -> crate::error::Result<bool>;
}

/// Answers every question the same way
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    pub answer: bool,
}

impl AutoConfirm {
    pub fn yes() -> Self {
        Self { answer: true }
    }

    pub fn no() -> Self {
        Self { answer: false }
    }
}

impl Confirmation for AutoConfirm {
    fn confirm(&self, _player: &PlayerId) -> crate::error::Result<bool> {
        Ok(self.answer)
    }
}

/// Asks a yes/no question on a line-oriented terminal
#[derive(Debug)]
pub struct PromptConfirmation<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> PromptConfirmation<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

impl PromptConfirmation<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr, read the answer from stdin
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

/// `y`/`yes` in any case is a yes, everything else a no
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl<R, W> Confirmation for PromptConfirmation<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, player: &PlayerId) -> crate::error::Result<bool> {
        {
            let mut output = self.output.lock().map_err(|_| EloError::StorageError {
                message: "Failed to acquire prompt output lock".to_string(),
            })?;
            write!(output, "Player '{}' does not exist. Create it? [y/N] ", player)
                .context("Failed to write prompt")?;
            output.flush().context("Failed to write prompt")?;
        }

        let mut input = self.input.lock().map_err(|_| EloError::StorageError {
            message: "Failed to acquire prompt input lock".to_string(),
        })?;
        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;

        Ok(is_yes(&answer))
    }
}
