//! Response parsing: provider text → object-rooted record.
//!
//! The contract is deliberately thin: the response must decode as a single
//! JSON object, and nothing more. Unexpected, missing, or extra fields
//! relative to the requested schema are accepted as-is — models drift from
//! requested shapes, and rejecting a usable record over a surplus field
//! helps nobody. What *is* rejected: undecodable text and non-object roots
//! (a bare array or scalar has no field names to display).
//!
//! One concession to model quirks before decoding: some models wrap their
//! JSON in a markdown fence despite the "only the JSON output" instruction.
//! The outer fence is stripped when present; everything else is passed to
//! the decoder untouched.

use crate::error::DocGleanError;
use crate::output::ExtractedRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n(.*)\n?```\s*$").unwrap());

/// Strip a single outer ``` / ```json fence if the whole response is
/// wrapped in one. Inner fences and unfenced text are left alone.
fn strip_outer_fence(input: &str) -> &str {
    match RE_OUTER_FENCE.captures(input) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(input),
        None => input,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse provider output into an [`ExtractedRecord`].
///
/// Fails with [`DocGleanError::MalformedResponse`] — raw text attached for
/// diagnosis — when the text does not decode, or decodes to anything other
/// than an object.
pub fn parse_record(response_text: &str) -> Result<ExtractedRecord, DocGleanError> {
    let body = strip_outer_fence(response_text.trim());

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DocGleanError::MalformedResponse {
            detail: format!("expected a JSON object, got {}", value_kind(&other)),
            raw: response_text.to_string(),
        }),
        Err(e) => Err(DocGleanError::MalformedResponse {
            detail: e.to_string(),
            raw: response_text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_root_parses() {
        let record = parse_record(r#"{"invoice_number": "42", "total": null}"#).unwrap();
        assert_eq!(record["invoice_number"], "42");
        assert!(record["total"].is_null());
    }

    #[test]
    fn non_json_fails() {
        let err = parse_record("not json").unwrap_err();
        assert!(matches!(err, DocGleanError::MalformedResponse { .. }), "got: {err}");
    }

    #[test]
    fn array_root_fails_with_kind_in_detail() {
        let err = parse_record("[1,2,3]").unwrap_err();
        match err {
            DocGleanError::MalformedResponse { detail, raw } => {
                assert!(detail.contains("array"), "got: {detail}");
                assert_eq!(raw, "[1,2,3]");
            }
            other => panic!("expected MalformedResponse, got: {other}"),
        }
    }

    #[test]
    fn scalar_root_fails() {
        assert!(parse_record("42").is_err());
        assert!(parse_record("\"just a string\"").is_err());
    }

    #[test]
    fn raw_response_is_attached_for_diagnosis() {
        let err = parse_record("oops {").unwrap_err();
        match err {
            DocGleanError::MalformedResponse { raw, .. } => assert_eq!(raw, "oops {"),
            other => panic!("expected MalformedResponse, got: {other}"),
        }
    }

    #[test]
    fn fenced_object_is_unwrapped() {
        let fenced = "```json\n{\"a\": 1}\n```";
        let record = parse_record(fenced).unwrap();
        assert_eq!(record["a"], 1);

        let plain_fence = "```\n{\"a\": 1}\n```";
        assert_eq!(parse_record(plain_fence).unwrap()["a"], 1);
    }

    #[test]
    fn inner_fences_survive() {
        let record = parse_record(r#"{"snippet": "```code```"}"#).unwrap();
        assert_eq!(record["snippet"], "```code```");
    }

    #[test]
    fn extra_and_missing_fields_are_accepted() {
        // No schema enforcement beyond object-rootedness.
        let record = parse_record(r#"{"totally_unexpected": {"nested": true}}"#).unwrap();
        assert!(record.contains_key("totally_unexpected"));
    }
}
