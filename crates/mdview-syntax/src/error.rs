use thiserror::Error;

/// Errors that stop a parse.
///
/// Reaching the end of the input is never an error: it closes whatever
/// block is open and the parse succeeds.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read markdown source: {0}")]
    Io(#[from] std::io::Error),

    /// Lookahead tried to push back more bytes than it consumed. This is an
    /// internal invariant violation, not a property of the input.
    #[error("cannot unread {requested} bytes, only {available} consumed since checkpoint")]
    Unread { requested: usize, available: usize },

    #[error("wrap width must be at least 1")]
    InvalidWidth,

    #[error("token sink aborted the parse")]
    Aborted,
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
