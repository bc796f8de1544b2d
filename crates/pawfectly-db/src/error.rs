use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0} connection lock poisoned")]
    LockPoisoned(&'static str),
}

impl DbError {
    /// A UNIQUE constraint (or unique index) rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_UNIQUE)
    }

    /// A FOREIGN KEY constraint rejected the write: the referenced user or
    /// match does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
    }

    fn constraint_code(&self) -> Option<i32> {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Some(e.extended_code)
            }
            _ => None,
        }
    }
}
