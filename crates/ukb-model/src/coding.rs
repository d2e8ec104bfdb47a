//! Coding-map aliases shared across the pipeline.

use std::collections::BTreeMap;

/// A resolved data-coding: raw code string to human-readable meaning.
pub type CodingMap = BTreeMap<String, String>;

/// Resolved coding maps keyed by coding id. Absence of an id means the
/// coding could not be resolved and its values pass through raw.
pub type CodingMaps = BTreeMap<u32, CodingMap>;
