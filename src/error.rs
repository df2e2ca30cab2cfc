//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("dictionary error: {0}")]
    Dictionary(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-turn failure raised by a responder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponderError {
    /// The random utterance pool has nothing to pick from.
    #[error("dictionary is empty (responder: {responder})")]
    EmptyDictionary { responder: String },
}
