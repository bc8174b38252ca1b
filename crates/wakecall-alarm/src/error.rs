use thiserror::Error;

/// Errors that can occur within the alarm subsystem.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// Underlying SQLite / rusqlite error.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A record exists in the store but is not a valid epoch-millisecond
    /// timestamp. Non-fatal: callers log it and treat the slot as empty.
    #[error("Corrupt alarm record: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, AlarmError>;
