//! Header planning: base-name resolution and stable column numbering.
//!
//! Planning runs in two explicit passes over immutable intermediates:
//! first resolve every column's base and count columns per base, then
//! assign sequence indexes and pad widths. Numbering therefore depends
//! only on header order, never on resolution side effects.

use std::collections::BTreeMap;

use ukb_model::{ColumnPlan, DataDictionary, InstanceMap, Udi};

use crate::names::snake;

/// Header spellings recognized as the subject-key column.
const SUBJECT_KEY_HEADERS: [&str; 2] = ["eid", "f.eid"];

/// Literal output name of the subject-key column.
pub const SUBJECT_KEY_NAME: &str = "eid";

/// Base-name style. A single style is supported today; the selector exists
/// so exports decoded with a future style remain distinguishable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingStyle {
    #[default]
    Snake,
}

/// Per-column resolution from pass 1, before numbering.
enum Resolved {
    SubjectKey,
    Column { udi: Option<Udi>, base: String },
}

/// Plan every output column for the given header row.
///
/// The subject-key column maps to the literal `eid`, is excluded from
/// numbering, and is never assigned a coding id. All other columns resolve
/// a base (exact description, field fallback, then raw header), then get a
/// zero-based index in first-encounter order within their base, zero-padded
/// to `max(2, digits(count - 1))`.
pub fn plan_headers(
    headers: &[String],
    dictionary: &DataDictionary,
    instances: &InstanceMap,
    style: NamingStyle,
) -> Vec<ColumnPlan> {
    // Pass 1: resolve bases and count columns per base.
    let mut resolved = Vec::with_capacity(headers.len());
    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    for header in headers {
        if is_subject_key(header) {
            resolved.push(Resolved::SubjectKey);
            continue;
        }
        let udi = Udi::parse_header(header);
        let base = resolve_base(header, udi.as_ref(), dictionary, style);
        *totals.entry(base.clone()).or_insert(0) += 1;
        resolved.push(Resolved::Column { udi, base });
    }

    // Pass 2: assign sequence, padding, instance notes, and coding ids.
    let mut running: BTreeMap<String, usize> = BTreeMap::new();
    let mut plans = Vec::with_capacity(headers.len());
    for (header, resolution) in headers.iter().zip(resolved) {
        match resolution {
            Resolved::SubjectKey => plans.push(ColumnPlan {
                raw: header.clone(),
                base: SUBJECT_KEY_NAME.to_string(),
                name: SUBJECT_KEY_NAME.to_string(),
                sequence: None,
                pad: 0,
                instance_note: None,
                coding_id: None,
            }),
            Resolved::Column { udi, base } => {
                let total = totals[&base];
                let pad = pad_width(total);
                let counter = running.entry(base.clone()).or_insert(0);
                let sequence = *counter;
                *counter += 1;

                let mut name = format!("{}_{:0width$}", base, sequence, width = pad);
                let instance_note = udi
                    .and_then(|udi| instances.description(udi.field, udi.instance))
                    .map(str::to_string);
                if let Some(note) = &instance_note {
                    name = format!("{name} ({note})");
                }
                let coding_id = udi.and_then(|udi| dictionary.coding_for(&udi));

                plans.push(ColumnPlan {
                    raw: header.clone(),
                    base,
                    name,
                    sequence: Some(sequence),
                    pad,
                    instance_note,
                    coding_id,
                });
            }
        }
    }
    plans
}

fn is_subject_key(header: &str) -> bool {
    let lowered = header.trim().to_lowercase();
    SUBJECT_KEY_HEADERS.iter().any(|known| lowered == *known)
}

/// Base resolution order: exact documented description, field-level
/// fallback description, then the raw header text.
fn resolve_base(
    header: &str,
    udi: Option<&Udi>,
    dictionary: &DataDictionary,
    style: NamingStyle,
) -> String {
    let text = udi
        .and_then(|udi| dictionary.description_for(udi))
        .unwrap_or(header);
    apply_style(text, style)
}

fn apply_style(text: &str, style: NamingStyle) -> String {
    match style {
        NamingStyle::Snake => snake(text),
    }
}

/// Zero-pad width for a base shared by `total` columns.
fn pad_width(total: usize) -> usize {
    let digits = total.saturating_sub(1).to_string().len();
    digits.max(2)
}

#[cfg(test)]
mod tests {
    use ukb_model::UdiRecord;

    use super::*;

    fn dictionary() -> DataDictionary {
        let mut dictionary = DataDictionary::new();
        dictionary.insert(UdiRecord {
            udi: "31-0.0".parse().unwrap(),
            description: "Sex".to_string(),
            coding_id: Some(9),
        });
        dictionary.insert(UdiRecord {
            udi: "3-0.0".parse().unwrap(),
            description: "Verbal interview duration".to_string(),
            coding_id: None,
        });
        dictionary
    }

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| (*h).to_string()).collect()
    }

    fn plan(raw: &[&str]) -> Vec<ColumnPlan> {
        plan_headers(
            &headers(raw),
            &dictionary(),
            &InstanceMap::default(),
            NamingStyle::Snake,
        )
    }

    #[test]
    fn subject_key_is_literal_and_unnumbered() {
        for spelling in ["eid", "EID", "f.eid", "F.EID"] {
            let plans = plan(&[spelling, "31-0.0"]);
            assert_eq!(plans[0].name, "eid");
            assert_eq!(plans[0].sequence, None);
            assert_eq!(plans[0].coding_id, None);
        }
    }

    #[test]
    fn documented_column_uses_description_and_coding() {
        let plans = plan(&["eid", "31-0.0"]);
        assert_eq!(plans[1].name, "sex_00");
        assert_eq!(plans[1].sequence, Some(0));
        assert_eq!(plans[1].coding_id, Some(9));
    }

    #[test]
    fn field_fallback_names_undocumented_variants() {
        let plans = plan(&["eid", "31-0.0", "31-1.0", "f.31.2.0"]);
        assert_eq!(plans[1].name, "sex_00");
        assert_eq!(plans[2].name, "sex_01");
        assert_eq!(plans[3].name, "sex_02");
        // Field-level coding fallback decodes every variant, not just the
        // documented one.
        assert_eq!(plans[2].coding_id, Some(9));
        assert_eq!(plans[3].coding_id, Some(9));
    }

    #[test]
    fn sequence_follows_first_encounter_order_across_interleaving() {
        let plans = plan(&["eid", "31-0.0", "3-0.0", "31-1.0"]);
        assert_eq!(plans[1].name, "sex_00");
        assert_eq!(plans[2].name, "verbal_interview_duration_00");
        assert_eq!(plans[3].name, "sex_01");
    }

    #[test]
    fn pad_width_grows_with_the_base_population() {
        assert_eq!(pad_width(1), 2);
        assert_eq!(pad_width(10), 2);
        assert_eq!(pad_width(11), 2);
        assert_eq!(pad_width(100), 2);
        assert_eq!(pad_width(101), 3);

        let mut raw: Vec<String> = vec!["eid".to_string()];
        raw.extend((0..101).map(|array| format!("31-0.{array}")));
        let plans = plan_headers(
            &raw,
            &dictionary(),
            &InstanceMap::default(),
            NamingStyle::Snake,
        );
        assert_eq!(plans[1].name, "sex_000");
        assert_eq!(plans[101].name, "sex_100");
    }

    #[test]
    fn unparsed_headers_sanitize_their_own_text() {
        let plans = plan(&["eid", "Free text notes"]);
        assert_eq!(plans[1].base, "free_text_notes");
        assert_eq!(plans[1].name, "free_text_notes_00");
        assert_eq!(plans[1].coding_id, None);
    }

    #[test]
    fn undocumented_field_falls_back_to_raw_header() {
        let plans = plan(&["eid", "9999-0.0"]);
        assert_eq!(plans[1].name, "9999_0_0_00");
    }

    #[test]
    fn instance_note_is_appended_in_parentheses() {
        let mut instances = InstanceMap::default();
        instances.insert(31, 1, "First repeat assessment visit (2012-13)".to_string());
        let plans = plan_headers(
            &headers(&["eid", "31-0.0", "31-1.0"]),
            &dictionary(),
            &instances,
            NamingStyle::Snake,
        );
        assert_eq!(plans[1].name, "sex_00");
        assert_eq!(
            plans[2].name,
            "sex_01 (First repeat assessment visit (2012-13))"
        );
    }

    #[test]
    fn planning_is_deterministic() {
        let first = plan(&["eid", "31-0.0", "3-0.0", "31-1.0"]);
        let second = plan(&["eid", "31-0.0", "3-0.0", "31-1.0"]);
        assert_eq!(first, second);
    }
}
