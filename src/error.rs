//! Error taxonomy shared by the helpers, commands and dispatcher.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Structurally invalid input to a helper or command constructor.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested name is not registered in the command map.
    #[error("cannot execute command, command not found: {0}")]
    CommandNotFound(String),

    /// The live text surface behind a buffer adapter is not ready.
    #[error("text buffer unavailable: {0}")]
    BufferUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
