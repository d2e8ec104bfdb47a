//! Parsed dictionary records and field-level fallbacks.
//!
//! A columns documentation page yields one [`UdiRecord`] per documented
//! identifier. Exports routinely carry instance/array variants the page does
//! not list, so the dictionary also keeps field-level fallbacks: the first
//! non-empty description and the first stated coding id seen for each field,
//! in document row order. First-wins order is authoritative and is therefore
//! captured at insertion time rather than derived later.

use std::collections::BTreeMap;

use crate::udi::Udi;

/// One documented column: an identifier with its description and, when the
/// page states one, the id of the data-coding used for its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdiRecord {
    pub udi: Udi,
    pub description: String,
    pub coding_id: Option<u32>,
}

/// Lookup tables produced by parsing a columns documentation page.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    records: BTreeMap<String, UdiRecord>,
    field_descriptions: BTreeMap<u32, String>,
    field_codings: BTreeMap<u32, u32>,
    coding_urls: BTreeMap<u32, String>,
}

impl DataDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, updating the field-level fallbacks first-wins.
    ///
    /// A triple maps to at most one record; re-inserting an already-known
    /// identifier leaves the existing record in place.
    pub fn insert(&mut self, record: UdiRecord) {
        let field = record.udi.field;
        if !record.description.is_empty() {
            self.field_descriptions
                .entry(field)
                .or_insert_with(|| record.description.clone());
        }
        if let Some(coding_id) = record.coding_id {
            self.field_codings.entry(field).or_insert(coding_id);
        }
        self.records.entry(record.udi.key()).or_insert(record);
    }

    pub fn record(&self, udi: &Udi) -> Option<&UdiRecord> {
        self.records.get(&udi.key())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Description for a column: the exact record's non-empty description,
    /// else the field-level fallback.
    pub fn description_for(&self, udi: &Udi) -> Option<&str> {
        if let Some(record) = self.record(udi)
            && !record.description.is_empty()
        {
            return Some(record.description.as_str());
        }
        self.field_descriptions.get(&udi.field).map(String::as_str)
    }

    /// Coding id for a column. The exact record's id strictly wins; the
    /// field-level fallback applies only when the record states none.
    pub fn coding_for(&self, udi: &Udi) -> Option<u32> {
        if let Some(record) = self.record(udi)
            && record.coding_id.is_some()
        {
            return record.coding_id;
        }
        self.field_codings.get(&udi.field).copied()
    }

    /// Remember the source URL a coding id was linked from.
    pub fn set_coding_url(&mut self, coding_id: u32, url: String) {
        self.coding_urls.entry(coding_id).or_insert(url);
    }

    pub fn coding_url(&self, coding_id: u32) -> Option<&str> {
        self.coding_urls.get(&coding_id).map(String::as_str)
    }

    pub fn coding_urls(&self) -> &BTreeMap<u32, String> {
        &self.coding_urls
    }
}
