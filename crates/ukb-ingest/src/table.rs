//! Delimited-table reading with dialect auto-detection.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Number of leading bytes sampled for delimiter detection.
const SNIFF_SAMPLE_LEN: usize = 2048;

/// Delimiters recognized by the sniffing heuristic.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b'\t', b';'];

/// An in-memory delimited table together with the dialect it was read with,
/// so output can be written back in the same dialect.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    pub delimiter: u8,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Pick the delimiter occurring most often in the sample's first line.
/// Falls back to `default` when no candidate appears at all.
pub fn detect_delimiter(sample: &[u8], default: u8) -> u8 {
    let first_line = sample.split(|&b| b == b'\n').next().unwrap_or(sample);
    let mut best = default;
    let mut best_count = 0usize;
    for candidate in CANDIDATE_DELIMITERS {
        let count = first_line.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Read a delimited table, sniffing the dialect from its leading bytes.
///
/// The first row becomes the header; short data rows are tolerated and
/// padded downstream. A file with no rows at all is a fatal error.
pub fn read_table(path: &Path) -> Result<DelimitedTable> {
    let raw = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sample_len = raw.len().min(SNIFF_SAMPLE_LEN);
    let delimiter = detect_delimiter(&raw[..sample_len], b',');
    debug!(path = %path.display(), delimiter = %(delimiter as char), "detected input dialect");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(raw.as_slice());
    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::Csv {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        records.push(record.iter().map(normalize_cell).collect());
    }

    let mut rows = records.into_iter();
    let Some(headers) = rows.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    Ok(DelimitedTable {
        delimiter,
        headers,
        rows: rows.collect(),
    })
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}
