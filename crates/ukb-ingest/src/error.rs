use std::path::PathBuf;

/// Errors raised while reading or writing delimited tables.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("input table {path} is empty")]
    EmptyTable { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
