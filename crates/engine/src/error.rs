use navdeck_core::CoreError;
use navdeck_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("validation error: {0}")]
    Validation(String),
}

impl DirectoryError {
    /// True when the failure is bad input rather than a store fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DirectoryError::Validation(_) | DirectoryError::Core(CoreError::Validation(_))
        )
    }
}
