use serde_json::{Map, Value};

use super::SynthesisError;

/// The four output fields after back-fill. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDraft {
    pub technique: String,
    pub findings: String,
    pub impression: String,
    pub internal_checks: Vec<String>,
}

/// Parse the model's content into the four report fields.
///
/// Missing or null fields are back-filled (empty text, empty check list).
/// Content that is not a JSON object is a malformed response.
pub fn parse_draft_response(content: &str) -> Result<ParsedDraft, SynthesisError> {
    let json_str = strip_code_fence(content);
    if json_str.is_empty() {
        return Err(SynthesisError::MalformedResponse("empty model content".into()));
    }

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| SynthesisError::MalformedResponse(format!("not valid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(SynthesisError::MalformedResponse(
            "top-level JSON is not an object".into(),
        ));
    };

    Ok(ParsedDraft {
        technique: text_field(&object, "technique"),
        findings: text_field(&object, "findings"),
        impression: text_field(&object, "impression"),
        internal_checks: checks_field(&object),
    })
}

/// Remove a surrounding ```` ```json ```` (or bare ```` ``` ````) fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(value_as_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => other.to_string(),
    }
}

fn checks_field(object: &Map<String, Value>) -> Vec<String> {
    match object.get("internal_checks") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(value_as_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(single) => {
            let text = value_as_text(single);
            if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
