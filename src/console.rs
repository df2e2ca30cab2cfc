//! Console channel: reads lines, prints the engine's reply.
//!
//! Runs until an empty line, end of input, or the `shutdown` token is
//! cancelled (Ctrl-C). Saving on exit is the caller's job.
//!
//! Lines starting with `:` are console commands:
//! - `:train <path>` queue a corpus file, replayed one line per iteration;
//!                   replayed lines are learned verbatim, even if they start with `:`
//! - `:save`         write the dictionary now

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::{AppError, ResponderError};
use crate::training::TrainingQueue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain input for the engine.
    Say(String),
    Train(PathBuf),
    Save,
    /// Leave the loop.
    Quit,
    Unknown(String),
}

/// Classify one trimmed input line.
pub fn parse_line(line: &str) -> Command {
    if line.is_empty() {
        return Command::Quit;
    }
    let Some(cmd) = line.strip_prefix(':') else {
        return Command::Say(line.to_string());
    };
    let (name, arg) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
    match (name, arg.trim()) {
        ("save", "") => Command::Save,
        ("train", path) if !path.is_empty() => Command::Train(PathBuf::from(path)),
        _ => Command::Unknown(line.to_string()),
    }
}

/// `name:responder> reply`
pub fn prompt(engine: &Engine) -> String {
    format!("{}:{}> ", engine.name(), engine.responder_name())
}

pub async fn run<R, W>(
    engine: &mut Engine,
    queue: &mut TrainingQueue,
    input: R,
    out: &mut W,
    shutdown: CancellationToken,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!(bot = %engine.name(), "console started");
    writeln!(out, "Unmo System prototype : {}", engine.name())?;

    let mut lines = input.lines();

    loop {
        if let Some(queued) = queue.pop() {
            // Give the Ctrl-C watcher a turn between replayed lines.
            tokio::task::yield_now().await;
            if shutdown.is_cancelled() {
                writeln!(out)?;
                info!(pending = queue.len(), "training interrupted, console shutting down");
                break;
            }
            // Corpus lines are utterances only, never console commands.
            writeln!(out, "training: {queued}")?;
            debug!(pending = queue.len(), "replaying training line");
            reply(engine, &queued, out)?;
            if queue.is_empty() {
                writeln!(out, "training is done")?;
            }
            continue;
        }

        write!(out, "> ")?;
        out.flush()?;

        let raw = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                writeln!(out)?;
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => match line {
                Err(e) => {
                    warn!("console read error: {e}");
                    break;
                }
                Ok(None) => {
                    info!("console input closed");
                    break;
                }
                Ok(Some(input)) => input,
            }
        };

        // Only a truly empty line ends the session; blank ones are skipped.
        if raw.is_empty() {
            break;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Command::Quit => break,
            Command::Save => match engine.save() {
                Ok(()) => writeln!(out, "saved")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Train(path) => match queue.load_file(&path) {
                Ok(q) => writeln!(out, "queued {} lines for training", q.queued)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Unknown(cmd) => writeln!(out, "unknown command: {cmd}")?,
            Command::Say(text) => {
                debug!(input = %text, "console received line");
                reply(engine, &text, out)?;
            }
        }
    }

    Ok(())
}

fn reply<W: Write>(engine: &mut Engine, text: &str, out: &mut W) -> Result<(), AppError> {
    match engine.turn(text) {
        Ok(reply) => writeln!(out, "{}{reply}", prompt(engine))?,
        Err(e) => {
            let ResponderError::EmptyDictionary { responder } = &e;
            writeln!(out, "{e}")?;
            writeln!(out, "警告: 辞書が空です。(Responder: {responder})")?;
        }
    }
    Ok(())
}
