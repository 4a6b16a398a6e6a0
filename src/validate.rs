//! Normalization of the raw `aqi` field reported by a station.
//!
//! Stations report the index as a number most of the time, but a numeric
//! string or a placeholder such as `"-"` shows up for offline sensors.

use serde_json::Value;

/// Converts a raw `aqi` field into an integer index.
///
/// Returns `None` whenever the value cannot be read as an integer. Finite
/// floats are truncated toward zero. Zero and negative values are passed
/// through unchanged; callers decide what they mean.
pub fn validate_aqi(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            float_to_index(f)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        // Booleans are not an index, even though they coerce to 0/1 elsewhere
        _ => None,
    }
}

fn float_to_index(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    // i64::MAX is not exactly representable; stay strictly below 2^63
    if truncated < -(2f64.powi(63)) || truncated >= 2f64.powi(63) {
        return None;
    }
    Some(truncated as i64)
}
