use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkTailError {
    #[error("Input is empty: {0}")]
    EmptyInput(String),

    #[error("Column not found in header: {column}")]
    ColumnNotFound { column: String },

    #[error("Unrecognised date: {0:?} (expected DD-MM-YYYY or YYYY-MM-DD)")]
    DateParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed CSV record: {0}")]
    MalformedRecord(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<tempfile::PersistError> for ChunkTailError {
    fn from(err: tempfile::PersistError) -> Self {
        ChunkTailError::IoError(err.error)
    }
}

pub type Result<T> = std::result::Result<T, ChunkTailError>;
