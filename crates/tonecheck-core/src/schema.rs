//! Schema validation for API requests and responses.
//!
//! These are the only functions that turn untrusted decoded JSON into the
//! typed values in [`crate::models`]. They reject anything that does not
//! match exactly: no trimming, no truncation, no numeric coercion. Unknown
//! extra fields on a response object are ignored.

use serde_json::{Map, Value};

use crate::error::SchemaViolation;
use crate::models::{
    AnalysisResult, AnalyzeRequest, GenerateRequest, GenerationResult, Tone, DEFAULT_TEMPERATURE,
    MAX_SUGGESTIONS, MAX_TEMPERATURE, MIN_SUGGESTIONS, MIN_TEMPERATURE, TEXT_MAX_LENGTH,
};

type Result<T> = std::result::Result<T, SchemaViolation>;

/// Validate a decoded `/analyze` response body.
///
/// Succeeds only if `suggestions` is an array of 2 or 3 strings, `tone` is
/// one of `positive`, `neutral`, `negative`, and `alternative_text` is a
/// string.
pub fn validate_analyze_response(value: &Value) -> Result<AnalysisResult> {
    let obj = as_object(value)?;

    let suggestions = string_array(obj, "suggestions")?;
    if suggestions.len() < MIN_SUGGESTIONS || suggestions.len() > MAX_SUGGESTIONS {
        return Err(SchemaViolation::new(
            "suggestions",
            format!(
                "expected {} to {} items, got {}",
                MIN_SUGGESTIONS,
                MAX_SUGGESTIONS,
                suggestions.len()
            ),
        ));
    }

    let tone_literal = required_str(obj, "tone")?;
    let tone = Tone::from_literal(tone_literal).ok_or_else(|| {
        SchemaViolation::new(
            "tone",
            format!(
                "expected one of positive, neutral, negative, got {:?}",
                tone_literal
            ),
        )
    })?;

    let alternative_text = required_str(obj, "alternative_text")?.to_string();

    Ok(AnalysisResult {
        suggestions,
        tone,
        alternative_text,
    })
}

/// Validate a decoded `/generate` response body.
pub fn validate_generate_response(value: &Value) -> Result<GenerationResult> {
    let obj = as_object(value)?;
    let generated_text = required_str(obj, "generated_text")?.to_string();
    Ok(GenerationResult { generated_text })
}

/// Validate a decoded `/generate` request body.
///
/// `temperature` defaults to 0.7 when the field is absent. A present
/// `null` is rejected. `selected_suggestions` must have one entry per
/// suggestion.
pub fn validate_generate_request(value: &Value) -> Result<GenerateRequest> {
    let obj = as_object(value)?;

    let text = required_str(obj, "text")?.to_string();
    let suggestions = string_array(obj, "suggestions")?;

    let selected = obj
        .get("selected_suggestions")
        .ok_or_else(|| missing("selected_suggestions"))?
        .as_array()
        .ok_or_else(|| SchemaViolation::new("selected_suggestions", "expected an array"))?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_bool().ok_or_else(|| {
                SchemaViolation::new(format!("selected_suggestions[{}]", i), "expected a boolean")
            })
        })
        .collect::<Result<Vec<bool>>>()?;

    let temperature = match obj.get("temperature") {
        None => DEFAULT_TEMPERATURE,
        Some(v) => v
            .as_f64()
            .ok_or_else(|| SchemaViolation::new("temperature", "expected a number"))?,
    };

    build_generate_request(&text, &suggestions, &selected, temperature)
}

/// Check the caller side of an `/analyze` call and build its body.
pub fn validate_analyze_request(text: &str, temperature: f64) -> Result<AnalyzeRequest> {
    check_text(text)?;
    check_temperature(temperature)?;
    Ok(AnalyzeRequest {
        text: text.to_string(),
        temperature,
    })
}

/// Check the caller side of a `/generate` call and build its body.
///
/// A length mismatch between `suggestions` and `selected` is rejected
/// here; the request is never padded or truncated to fit.
pub fn build_generate_request(
    text: &str,
    suggestions: &[String],
    selected: &[bool],
    temperature: f64,
) -> Result<GenerateRequest> {
    check_text(text)?;
    if suggestions.is_empty() {
        return Err(SchemaViolation::new(
            "suggestions",
            "expected at least one suggestion",
        ));
    }
    if selected.len() != suggestions.len() {
        return Err(SchemaViolation::new(
            "selected_suggestions",
            format!(
                "expected {} flags (one per suggestion), got {}",
                suggestions.len(),
                selected.len()
            ),
        ));
    }
    check_temperature(temperature)?;

    Ok(GenerateRequest {
        text: text.to_string(),
        suggestions: suggestions.to_vec(),
        selected_suggestions: selected.to_vec(),
        temperature,
    })
}

/// Input text must be non-blank and at most [`TEXT_MAX_LENGTH`] characters.
pub fn check_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(SchemaViolation::new("text", "must not be empty"));
    }
    let len = text.chars().count();
    if len > TEXT_MAX_LENGTH {
        return Err(SchemaViolation::new(
            "text",
            format!("must be at most {} characters, got {}", TEXT_MAX_LENGTH, len),
        ));
    }
    Ok(())
}

/// Temperature must be a finite number in `[0, 2]`.
pub fn check_temperature(temperature: f64) -> Result<()> {
    if !temperature.is_finite() || !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(SchemaViolation::new(
            "temperature",
            format!(
                "must be in [{}, {}], got {}",
                MIN_TEMPERATURE, MAX_TEMPERATURE, temperature
            ),
        ));
    }
    Ok(())
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SchemaViolation::new("$", format!("expected an object, got {}", kind_of(value))))
}

fn missing(field: &str) -> SchemaViolation {
    SchemaViolation::new(field, "required field is missing")
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    let v = obj.get(field).ok_or_else(|| missing(field))?;
    v.as_str().ok_or_else(|| {
        SchemaViolation::new(field, format!("expected a string, got {}", kind_of(v)))
    })
}

fn string_array(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>> {
    let v = obj.get(field).ok_or_else(|| missing(field))?;
    let items = v.as_array().ok_or_else(|| {
        SchemaViolation::new(field, format!("expected an array, got {}", kind_of(v)))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                SchemaViolation::new(
                    format!("{}[{}]", field, i),
                    format!("expected a string, got {}", kind_of(item)),
                )
            })
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_response_two_suggestions() {
        let v = json!({
            "suggestions": ["Be more specific", "Shorten the intro"],
            "tone": "neutral",
            "alternative_text": "Rewritten"
        });
        let r = validate_analyze_response(&v).unwrap();
        assert_eq!(r.suggestions.len(), 2);
        assert_eq!(r.tone, Tone::Neutral);
        assert_eq!(r.alternative_text, "Rewritten");
    }

    #[test]
    fn test_analyze_response_three_suggestions() {
        let v = json!({
            "suggestions": ["a", "b", "c"],
            "tone": "negative",
            "alternative_text": ""
        });
        let r = validate_analyze_response(&v).unwrap();
        assert_eq!(r.suggestions, vec!["a", "b", "c"]);
        assert_eq!(r.tone, Tone::Negative);
    }

    #[test]
    fn test_analyze_response_ignores_extra_fields() {
        let v = json!({
            "suggestions": ["a", "b"],
            "tone": "positive",
            "alternative_text": "y",
            "model": "deepseek-chat"
        });
        assert!(validate_analyze_response(&v).is_ok());
    }

    #[test]
    fn test_analyze_response_one_suggestion_rejected() {
        let v = json!({"tone": "positive", "suggestions": ["x"], "alternative_text": "y"});
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "suggestions");
    }

    #[test]
    fn test_analyze_response_four_suggestions_rejected() {
        let v = json!({
            "tone": "positive",
            "suggestions": ["a", "b", "c", "d"],
            "alternative_text": "y"
        });
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "suggestions");
        assert!(err.reason.contains("got 4"));
    }

    #[test]
    fn test_analyze_response_missing_tone() {
        let v = json!({"suggestions": ["a", "b"], "alternative_text": "y"});
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "tone");
    }

    #[test]
    fn test_analyze_response_unknown_tone() {
        let v = json!({"suggestions": ["a", "b"], "tone": "Positive", "alternative_text": "y"});
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "tone");
    }

    #[test]
    fn test_analyze_response_non_string_suggestion_names_index() {
        let v = json!({"suggestions": ["a", 7], "tone": "neutral", "alternative_text": "y"});
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "suggestions[1]");
    }

    #[test]
    fn test_analyze_response_not_an_object() {
        let err = validate_analyze_response(&json!(["a", "b"])).unwrap_err();
        assert_eq!(err.field, "$");
    }

    #[test]
    fn test_analyze_response_missing_alternative_text() {
        let v = json!({"suggestions": ["a", "b"], "tone": "neutral"});
        let err = validate_analyze_response(&v).unwrap_err();
        assert_eq!(err.field, "alternative_text");
    }

    #[test]
    fn test_generate_response() {
        let r = validate_generate_response(&json!({"generated_text": "Hello"})).unwrap();
        assert_eq!(r.generated_text, "Hello");
        let err = validate_generate_response(&json!({"generated_text": 3})).unwrap_err();
        assert_eq!(err.field, "generated_text");
        assert!(validate_generate_response(&json!({})).is_err());
    }

    #[test]
    fn test_generate_request_defaults_temperature() {
        let v = json!({
            "text": "Hej",
            "suggestions": ["a", "b"],
            "selected_suggestions": [true, false]
        });
        let req = validate_generate_request(&v).unwrap();
        assert!((req.temperature - DEFAULT_TEMPERATURE).abs() < 1e-12);
        assert_eq!(req.selected_suggestions, vec![true, false]);
    }

    #[test]
    fn test_generate_request_rejects_null_temperature() {
        let v = json!({
            "text": "Hej",
            "suggestions": ["a"],
            "selected_suggestions": [true],
            "temperature": null
        });
        let err = validate_generate_request(&v).unwrap_err();
        assert_eq!(err.field, "temperature");
    }

    #[test]
    fn test_generate_request_bounds() {
        let base = |t: Value, s: Value, sel: Value, temp: Value| {
            json!({"text": t, "suggestions": s, "selected_suggestions": sel, "temperature": temp})
        };

        let err = validate_generate_request(&base(json!(""), json!(["a"]), json!([true]), json!(0.7)))
            .unwrap_err();
        assert_eq!(err.field, "text");

        let long = "x".repeat(TEXT_MAX_LENGTH + 1);
        let err = validate_generate_request(&base(json!(long), json!(["a"]), json!([true]), json!(0.7)))
            .unwrap_err();
        assert_eq!(err.field, "text");

        let err = validate_generate_request(&base(json!("t"), json!([]), json!([]), json!(0.7)))
            .unwrap_err();
        assert_eq!(err.field, "suggestions");

        let err = validate_generate_request(&base(json!("t"), json!(["a"]), json!(["yes"]), json!(0.7)))
            .unwrap_err();
        assert_eq!(err.field, "selected_suggestions[0]");

        let err = validate_generate_request(&base(json!("t"), json!(["a"]), json!([true]), json!(2.5)))
            .unwrap_err();
        assert_eq!(err.field, "temperature");

        assert!(
            validate_generate_request(&base(json!("t"), json!(["a"]), json!([true]), json!(2.0)))
                .is_ok()
        );
        assert!(
            validate_generate_request(&base(json!("t"), json!(["a"]), json!([false]), json!(0)))
                .is_ok()
        );
    }

    #[test]
    fn test_generate_request_length_mismatch_rejected() {
        let suggestions = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let err = build_generate_request("text", &suggestions, &[true, false], 0.7).unwrap_err();
        assert_eq!(err.field, "selected_suggestions");
        assert!(err.reason.contains("expected 3"));
    }

    #[test]
    fn test_text_limit_counts_characters() {
        // 5000 two-byte characters are within the limit.
        let text = "é".repeat(TEXT_MAX_LENGTH);
        assert!(check_text(&text).is_ok());
        assert!(check_text("   \n").is_err());
    }

    #[test]
    fn test_temperature_rejects_nan() {
        assert!(check_temperature(f64::NAN).is_err());
        assert!(check_temperature(-0.1).is_err());
        assert!(check_temperature(0.0).is_ok());
    }

    #[test]
    fn test_analyze_request() {
        let req = validate_analyze_request("Some text", 1.2).unwrap();
        assert_eq!(req.text, "Some text");
        assert!(validate_analyze_request("", 0.7).is_err());
    }
}
