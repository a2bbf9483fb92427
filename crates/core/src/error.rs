use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HandbookError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no handbook file at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("handbook file {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read handbook file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to list handbook directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type HandbookResult<T> = std::result::Result<T, HandbookError>;
