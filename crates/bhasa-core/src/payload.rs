//! Normalization of upstream response payloads.
//!
//! Pure functions, no I/O. Both Google endpoints answer with deeply nested
//! JSON arrays rather than objects; these helpers flatten them into the
//! single string the `{ result }` contract carries. `None` means the
//! payload did not have the expected shape.

use serde_json::Value;

/// Extract the translated text from a `translate_a/single` payload.
///
/// Shape: `[[["Translated", "Original", ...], ...], ...]`, one inner
/// entry per sentence segment. Segments are joined in order so multi-
/// sentence input comes back as one string.
pub fn translation_text(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;
    let mut result = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            result.push_str(part);
        }
    }
    Some(result)
}

/// Extract the first suggestion from an Input Tools payload.
///
/// Shape: `["SUCCESS", [["namaste", ["नमस्ते", "नमस्ते!", ...], ...]]]`.
pub fn suggestion_text(payload: &Value) -> Option<String> {
    payload
        .get(1)?
        .get(0)?
        .get(1)?
        .get(0)?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn translation_joins_segments_in_order() {
        let payload = json!([
            [
                ["नमस्ते ", "hello ", null, null],
                ["संसार", "world", null, null]
            ],
            null,
            "ne"
        ]);
        assert_eq!(translation_text(&payload).as_deref(), Some("नमस्ते संसार"));
    }

    #[test]
    fn translation_single_segment() {
        let payload = json!([[["नमस्ते", "namaste", null]], null, "ne"]);
        assert_eq!(translation_text(&payload).as_deref(), Some("नमस्ते"));
    }

    #[test]
    fn translation_rejects_missing_segment_array() {
        assert_eq!(translation_text(&json!({ "error": true })), None);
        assert_eq!(translation_text(&json!(null)), None);
        assert_eq!(translation_text(&json!(["not-an-array"])), None);
    }

    #[test]
    fn translation_skips_non_string_parts() {
        let payload = json!([[["नमस्ते", "a"], [42, "b"]], null]);
        assert_eq!(translation_text(&payload).as_deref(), Some("नमस्ते"));
    }

    #[test]
    fn suggestion_takes_first_candidate() {
        let payload = json!([
            "SUCCESS",
            [["namaste", ["नमस्ते", "नमस्ते!"], [], { "candidate_type": [0, 0] }]]
        ]);
        assert_eq!(suggestion_text(&payload).as_deref(), Some("नमस्ते"));
    }

    #[test]
    fn suggestion_rejects_failure_shape() {
        assert_eq!(suggestion_text(&json!(["FAILED_TO_PARSE_REQUEST_BODY"])), None);
        assert_eq!(suggestion_text(&json!(["SUCCESS", []])), None);
        assert_eq!(suggestion_text(&json!(["SUCCESS", [["namaste", []]]])), None);
    }
}
