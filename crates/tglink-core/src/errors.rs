use std::path::PathBuf;

/// Core error type.
///
/// Adapter crates map their specific failures into this type; the service
/// turns it into an [`ErrorKind`](crate::outcome::ErrorKind) at the public
/// operation boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("telegram gateway error: {0}")]
    Gateway(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid directory file: {path}: {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
