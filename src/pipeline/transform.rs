//! Display partitioning: record → main fields / item rows / summary.
//!
//! The partition is a total function over the record's top-level keys:
//! every key lands in exactly one bucket. The only lossy step — an
//! irregular `items` shape — degrades to empty rows with a warning rather
//! than failing, because the rest of the record is still displayable.

use crate::output::{DisplayBundle, ExtractedRecord};
use serde_json::Value;
use tracing::warn;

/// Keys carrying a narrative summary. Consumed by the summary bucket even
/// when empty or null, so they never leak into `main_fields`.
const SUMMARY_KEYS: [&str; 3] = ["overall_summary", "key_clauses_summary", "summary"];

/// Split an extracted record into its display bundle.
///
/// Rules, applied once per top-level key:
/// * `items` with an array value → `item_rows` when every element is an
///   object (input order preserved); an empty array yields no rows; a
///   mixed-shape array yields no rows and logs a warning. `items` with a
///   non-array value is an ordinary field and falls through to
///   `main_fields`.
/// * Summary-role keys → `summary_text` by fixed precedence:
///   `overall_summary` wins whenever non-empty; `key_clauses_summary` and
///   then `summary` only fill an empty slot. A later key never overwrites
///   an already-chosen non-empty summary.
/// * Everything else → `main_fields` with its native value.
pub fn transform(record: &ExtractedRecord) -> DisplayBundle {
    let mut bundle = DisplayBundle::default();

    for (key, value) in record {
        if let ("items", Some(items)) = (key.as_str(), value.as_array()) {
            if items.is_empty() {
                continue;
            }
            match item_rows(items) {
                Some(rows) => bundle.item_rows = rows,
                None => {
                    warn!("'items' is not a uniform list of objects; dropping item rows");
                }
            }
        } else if SUMMARY_KEYS.contains(&key.as_str()) {
            let candidate = value.as_str().map(str::trim).unwrap_or_default();
            if candidate.is_empty() {
                continue;
            }
            if key == "overall_summary" || bundle.summary_text.is_empty() {
                bundle.summary_text = candidate.to_string();
            }
        } else {
            bundle.main_fields.insert(key.clone(), value.clone());
        }
    }

    bundle
}

/// Extract line-item rows when every element is an object.
fn item_rows(items: &[Value]) -> Option<Vec<ExtractedRecord>> {
    items
        .iter()
        .map(|item| item.as_object().cloned())
        .collect()
}

/// Secondary flattened view of a record for flat rendering surfaces
/// (key-value tables, CSV-ish exports).
///
/// Every key except `items` appears, in record order, with its value
/// display-normalised: lists become a ", "-delimited string, nested objects
/// a compact JSON encoding, null an empty string. This normalisation never
/// applies to [`DisplayBundle::main_fields`], which keeps native values.
pub fn flatten(record: &ExtractedRecord) -> Vec<(String, String)> {
    record
        .iter()
        .filter(|(key, _)| key.as_str() != "items")
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect()
}

/// Render one JSON value for a flat textual surface.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> ExtractedRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn overall_summary_wins_regardless_of_order() {
        let bundle = transform(&record(
            r#"{"a": 1, "summary": "S1", "overall_summary": "S2"}"#,
        ));
        assert_eq!(bundle.summary_text, "S2");
        assert_eq!(bundle.main_fields.len(), 1);
        assert_eq!(bundle.main_fields["a"], 1);
    }

    #[test]
    fn lone_summary_is_chosen() {
        let bundle = transform(&record(r#"{"summary": "S1"}"#));
        assert_eq!(bundle.summary_text, "S1");
        assert!(bundle.main_fields.is_empty());
    }

    #[test]
    fn key_clauses_beats_plain_summary() {
        let bundle = transform(&record(
            r#"{"summary": "S1", "key_clauses_summary": "KC"}"#,
        ));
        assert_eq!(bundle.summary_text, "KC");
    }

    #[test]
    fn empty_summaries_never_overwrite_a_chosen_one() {
        let bundle = transform(&record(
            r#"{"key_clauses_summary": "KC", "overall_summary": "", "summary": null}"#,
        ));
        assert_eq!(bundle.summary_text, "KC");
        // summary-role keys are consumed even when empty/null
        assert!(bundle.main_fields.is_empty());
    }

    #[test]
    fn items_become_rows_in_input_order() {
        let bundle = transform(&record(
            r#"{"items": [{"x": 1}, {"x": 2}], "total": "5"}"#,
        ));
        assert_eq!(bundle.item_rows.len(), 2);
        assert_eq!(bundle.item_rows[0]["x"], 1);
        assert_eq!(bundle.item_rows[1]["x"], 2);
        assert_eq!(bundle.main_fields.len(), 1);
        assert_eq!(bundle.main_fields["total"], "5");
    }

    #[test]
    fn empty_items_yield_no_rows_and_no_main_field() {
        let bundle = transform(&record(r#"{"items": []}"#));
        assert!(bundle.item_rows.is_empty());
        assert!(bundle.main_fields.is_empty());
    }

    #[test]
    fn irregular_items_degrade_to_empty_rows() {
        let bundle = transform(&record(r#"{"items": [{"x": 1}, "stray"], "a": 1}"#));
        assert!(bundle.item_rows.is_empty());
        assert_eq!(bundle.main_fields["a"], 1);
    }

    #[test]
    fn non_array_items_value_is_an_ordinary_field() {
        let bundle = transform(&record(r#"{"items": "three widgets"}"#));
        assert!(bundle.item_rows.is_empty());
        assert_eq!(bundle.main_fields["items"], "three widgets");
    }

    #[test]
    fn partition_is_total() {
        let rec = record(
            r#"{"a": 1, "items": [{"x": 1}], "summary": "S", "nested": {"k": "v"}}"#,
        );
        let bundle = transform(&rec);
        let bucketed = bundle.main_fields.len()
            + usize::from(!bundle.item_rows.is_empty())
            + usize::from(!bundle.summary_text.is_empty());
        assert_eq!(bucketed, rec.len());
    }

    #[test]
    fn flatten_joins_lists_and_compacts_objects() {
        let rec = record(
            r#"{"parties": ["A", "B"], "meta": {"k": "v"}, "n": 3, "gone": null, "items": [{"x": 1}]}"#,
        );
        let flat: std::collections::HashMap<_, _> = flatten(&rec).into_iter().collect();
        assert_eq!(flat["parties"], "A, B");
        assert_eq!(flat["meta"], r#"{"k":"v"}"#);
        assert_eq!(flat["n"], "3");
        assert_eq!(flat["gone"], "");
        assert!(!flat.contains_key("items"));
    }
}
