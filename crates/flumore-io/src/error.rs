use thiserror::Error;

/// Result type local to flumore-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load dataset '{path}': {reason}")]
    Load { path: String, reason: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Collapse into a `Load` error for `path`, keeping an existing reason.
    pub fn into_load(self, path: &str) -> Error {
        match self {
            Error::Load { .. } => self,
            other => Error::Load {
                path: path.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
