use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cookie jar I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cookie jar is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
