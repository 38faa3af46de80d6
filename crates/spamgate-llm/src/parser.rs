//! Parse classifier output into a verdict

use crate::LlmError;
use serde_json::Value;
use spamgate_domain::ClassificationVerdict;

/// Parse the model's JSON answer into a [`ClassificationVerdict`]
///
/// The answer must be a JSON object with an `is_spam` field. `confidence`
/// defaults to 0 and is clamped to 0-100, `reasoning` defaults to a fixed
/// placeholder and `spam_indicators` to an empty list.
pub fn parse_verdict(response: &str) -> Result<ClassificationVerdict, LlmError> {
    let json_str = extract_json(response);

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse AI response: {}", e)))?;

    let obj = json.as_object().ok_or(LlmError::MissingDetermination)?;

    let is_spam = obj
        .get("is_spam")
        .and_then(truthy)
        .ok_or(LlmError::MissingDetermination)?;

    let confidence = obj.get("confidence").map(confidence_percent).unwrap_or(0);

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ClassificationVerdict::NO_REASONING.to_string());

    let indicators: Vec<String> = obj
        .get("spam_indicators")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(ClassificationVerdict {
        is_spam,
        confidence,
        reasoning,
        indicators,
    })
}

/// Strip a markdown code fence if the model wrapped its JSON in one
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the language tag line, then the closing fence
        let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
        body.trim_end().trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

/// Loose boolean reading of a JSON value; `None` for null
fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => {
            let s = s.trim();
            Some(!(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("no")))
        }
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(map) => Some(!map.is_empty()),
    }
}

fn confidence_percent(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    raw.filter(|f| f.is_finite())
        .map(|f| f.clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
