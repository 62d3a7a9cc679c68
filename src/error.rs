use thiserror::Error;

/// Failures reported by the invoice service boundary.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid PIN")]
    InvalidPin,
    #[error("unknown invoice")]
    NotFound,
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Workflow-level error taxonomy. Every network failure is converted into one
/// of these before reaching a caller; nothing escapes as a panic.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Bad PIN or unknown invoice. Shown inline, never retried automatically.
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// A local form constraint failed. Blocks submission before any request.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The update request failed. The review stage is left unchanged so the
    /// user can retry deliberately.
    #[error("submission failed: {0}")]
    Submission(String),
    /// A stage was entered without its required context. Recovered by a
    /// silent redirect to PIN entry, never rendered to the user.
    #[error("stage entered without required context")]
    NavigationGuard,
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
