use thiserror::Error;

/// Recoverable, user-visible validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter at least one name.")]
    EmptyInput,
    #[error("Add some audience members first!")]
    EmptyAudience,
    #[error("A draw is already in progress.")]
    DrawInProgress,
}
