//! Response handling for raw model text: sanitize, extract the JSON array, decode.
//!
//! The generation service has no enforced output contract, so everything that comes
//! back is treated as untrusted text. Two stages, one failure kind each:
//! extraction (`LlmError::NoJsonArray`) and decoding (`LlmError::Parse`).

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::LlmError;

/// Strips markdown artifacts and returns the greedy `[` .. `]` span of the cleaned text.
///
/// Every literal `json`, triple backtick and single backtick is removed (case-sensitive,
/// global) before the search. The span runs from the first `[` to the last `]` without
/// balancing brackets, so a response holding two separate arrays, or prose containing a
/// literal `[...]`, produces a span that will not decode. That limitation is kept on purpose.
pub fn extract_json_array(raw: &str) -> Result<String, LlmError> {
    let cleaned = raw.trim().replace("json", "").replace('`', "");

    let start = cleaned.find('[').ok_or(LlmError::NoJsonArray)?;
    let end = cleaned.rfind(']').ok_or(LlmError::NoJsonArray)?;
    if end < start {
        return Err(LlmError::NoJsonArray);
    }

    Ok(cleaned[start..=end].to_string())
}

/// Decodes an extracted span into a sequence of untyped records.
/// Record shape is left to the caller.
pub fn parse_records(extracted: &str) -> Result<Vec<Value>, LlmError> {
    serde_json::from_str::<Vec<Value>>(extracted).map_err(|e| LlmError::Parse(e.to_string()))
}

/// Full sanitize-then-parse pipeline over raw model text.
pub fn sanitize_and_parse(raw: &str) -> Result<Vec<Value>, LlmError> {
    let extracted = extract_json_array(raw)?;
    parse_records(&extracted)
}

/// Converts untyped records into the caller's record shape.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, LlmError> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record)
                .map_err(|e| LlmError::UnexpectedShape(format!("record {i}: {e}")))
        })
        .collect()
}

/// First `max_chars` characters of model output, for log lines.
pub(crate) fn preview(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}
