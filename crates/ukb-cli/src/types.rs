use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a full decode run.
#[derive(Debug)]
pub struct DecodeResult {
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_written: usize,
    pub columns: usize,
    /// Columns that received a planned semantic name (everything except the
    /// subject-key column).
    pub renamed: usize,
    pub codings: Vec<CodingSummary>,
    pub elapsed: Duration,
}

/// Resolution outcome for one required coding id.
#[derive(Debug)]
pub struct CodingSummary {
    pub coding_id: u32,
    /// Columns decoded with this coding.
    pub columns: usize,
    /// Entries in the resolved map; zero when unresolved.
    pub entries: usize,
    pub resolved: bool,
}
