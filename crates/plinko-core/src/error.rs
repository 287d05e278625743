use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The poll id is unknown or the poll was already closed.
    #[error("not found")]
    NotFound,
    /// The caller supplied a bad reference or malformed input.
    #[error("bad request: {0}")]
    BadRequest(String),
}
