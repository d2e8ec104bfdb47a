//! Column plans: the per-column output of header planning.

/// Planned output for one column of the source table.
///
/// Plans are computed in a count-then-assign pass over the whole header row
/// before any output is written, and are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Raw header text from the source table.
    pub raw: String,
    /// Sanitized base token, shared by every column resolving to the same
    /// description.
    pub base: String,
    /// Final output header, including the numeric suffix and any instance
    /// note.
    pub name: String,
    /// Zero-based index among columns sharing the base, in first-encounter
    /// order. `None` exactly for the subject-key column, which is never
    /// numbered.
    pub sequence: Option<usize>,
    /// Zero-pad width of the numeric suffix: `max(2, digits(n - 1))` where
    /// `n` is the number of columns sharing the base. Zero when unnumbered.
    pub pad: usize,
    /// Instance description appended in parentheses, when configured.
    pub instance_note: Option<String>,
    /// Coding id used to decode this column's values, when documented.
    pub coding_id: Option<u32>,
}
