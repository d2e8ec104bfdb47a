//! Row decoding: replace raw categorical codes with resolved meanings.

use ukb_model::{CodingMap, CodingMaps, ColumnPlan};

/// Characters accepted as separators in multi-valued cells.
const SPLIT_SEPARATORS: [char; 3] = [';', ',', '|'];

/// Canonical separator used to rejoin decoded tokens.
const JOIN_SEPARATOR: &str = ";";

/// Rewrites data rows one at a time, mapping coded values to meanings per
/// the column plans. Columns without a coding id, or whose id has no
/// resolved map, pass their values through unchanged.
pub struct DecodeEngine<'a> {
    /// Resolved map per output column, `None` where values pass through.
    columns: Vec<Option<&'a CodingMap>>,
}

impl<'a> DecodeEngine<'a> {
    /// Pair each planned column with its resolved coding map, if any.
    pub fn new(plans: &[ColumnPlan], maps: &'a CodingMaps) -> Self {
        let columns = plans
            .iter()
            .map(|plan| plan.coding_id.and_then(|id| maps.get(&id)))
            .collect();
        Self { columns }
    }

    /// Decode one row, padding short rows with empty values to the header
    /// length.
    pub fn decode_row(&self, row: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(self.columns.len());
        for (index, map) in self.columns.iter().enumerate() {
            let raw = row.get(index).map(String::as_str).unwrap_or("");
            match map {
                Some(map) if !raw.is_empty() => out.push(decode_cell(raw, map)),
                _ => out.push(raw.to_string()),
            }
        }
        out
    }
}

/// Decode one possibly multi-valued cell, leaving unknown tokens unchanged.
fn decode_cell(raw: &str, map: &CodingMap) -> String {
    let mut decoded = Vec::new();
    for token in raw.split(SPLIT_SEPARATORS) {
        let token = token.trim().trim_matches('"');
        if token.is_empty() {
            continue;
        }
        match map.get(token) {
            Some(meaning) => decoded.push(meaning.as_str()),
            None => decoded.push(token),
        }
    }
    decoded.join(JOIN_SEPARATOR)
}
