//! Lenient JSON value coercion
//!
//! Clients send partially filled or loosely typed payloads. Nothing here
//! fails: unusable values collapse to a documented default.

use serde_json::Value;

/// Coerce a field to trimmed text
///
/// Strings pass through, numbers use their decimal text, `true` becomes
/// `"1"`. `false`, `null`, arrays, objects and absent fields become `""`.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

/// Coerce a field to a finite `f64`, or return `default`
///
/// Accepts JSON numbers, strings whose trimmed text is a finite number, and
/// booleans (1 / 0). Anything else, including `"NaN"`, `"inf"` and absent
/// fields, yields `default`.
pub fn parse_number_or_default(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}
