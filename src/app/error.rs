// src/app/error.rs
use thiserror::Error;

/// Failure kinds shared by every collaborator the core talks to.
///
/// `Stale` is not a real failure: it marks a result that arrived after its
/// slot was reassigned and was dropped on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("stale result discarded")]
    Stale,
}

impl MediaError {
    /// True for the discard signal, false for anything that actually went wrong.
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
