use std::path::PathBuf;

/// Errors raised while parsing documentation pages.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The page carries no table with identifier and description columns.
    #[error("dictionary format not recognized: no columns table found")]
    NoColumnsTable,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
