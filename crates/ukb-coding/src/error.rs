use std::path::PathBuf;

/// Errors raised by the resolution layer. Failures to resolve a single
/// coding id are warnings, not errors; only infrastructure problems reach
/// this type.
#[derive(Debug, thiserror::Error)]
pub enum CodingError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to write cache {path}: {message}")]
    CacheWrite { path: PathBuf, message: String },
}
