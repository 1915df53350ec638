use thiserror::Error;

/// Why a DevMode command was rejected. Every variant is recoverable:
/// the caller reports the message and keeps the session running.
#[derive(Debug, Error)]
pub enum DevModeError {
    /// Malformed argument or unrecognized command
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed value outside the allowed range, duplicate name, unknown type
    #[error("invalid value: {0}")]
    Validation(String),

    /// The command edits an element but none is selected
    #[error("no element selected")]
    Selection,

    /// Persistence read/write failed
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl DevModeError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
