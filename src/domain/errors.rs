use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller-correctable input problem (empty cart, disallowed field,
    /// disallowed status value). Never partially applied.
    #[error("{0}")]
    Validation(String),

    /// The resolved role lacks permission for the operation or target.
    #[error("{0}")]
    Authorization(String),

    #[error("Not found")]
    NotFound,

    /// Concurrent-mutation race detected; the caller may retry.
    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
