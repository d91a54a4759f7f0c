use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Unknown building index {index}")]
    UnknownBuilding { index: usize },

    #[error("Unknown upgrade '{id}'")]
    UnknownUpgrade { id: String },
}

pub type SaveResult<T> = Result<T, SaveError>;
