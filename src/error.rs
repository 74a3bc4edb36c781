use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("console io: {0}")]
    Io(#[from] std::io::Error),

    #[error("table {table} has {expected} columns but {actual} values were supplied")]
    ArityMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("table {table} has no column named {column}")]
    UnknownColumn { table: String, column: String },

    #[error("table {table} already holds the largest possible id")]
    IdExhausted { table: String },

    #[error("standard input closed while waiting for a value")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
