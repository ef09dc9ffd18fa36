use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("order key conflict: {0}")]
    Conflict(String),
}

impl StorageError {
    /// Maps a uniqueness violation on the order key to `Conflict`; anything
    /// else stays a plain sqlite error.
    pub(crate) fn from_order_write(e: rusqlite::Error, context: &str) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::Conflict(context.to_string())
            }
            e => StorageError::Sqlite(e),
        }
    }
}
