use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("catalog has no rows")]
    EmptyCatalog,

    #[error("malformed catalog row {row}: {message}")]
    Data { row: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn data(row: usize, message: impl Into<String>) -> Self {
        Self::Data { row, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
