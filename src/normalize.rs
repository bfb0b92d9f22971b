use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Coerces an upstream amount value into a plain number.
///
/// Upstream rows encode amounts inconsistently: sometimes a JSON number,
/// sometimes a string carrying currency punctuation ("1,200.50", "$500").
/// Anything that cannot be read as a finite number coerces to 0.0 rather
/// than failing the surrounding pass.
pub fn parse_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_amount_str(s),
        _ => 0.0,
    }
}

/// String form of [`parse_amount`]: strips thousands separators and any
/// other non-numeric characters before parsing.
pub fn parse_amount_str(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Reads a timestamp-like value into a UTC-naive datetime.
///
/// Accepts the platform's `{seconds, nanoseconds}` timestamp objects, the
/// serialized `{_seconds}` epoch form, RFC 3339 / common date strings, and
/// bare numeric epochs (milliseconds vs seconds decided by magnitude).
/// Returns `None` when no shape matches.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Object(map) => {
            let seconds = map.get("seconds").or_else(|| map.get("_seconds"))?;
            let secs = seconds
                .as_i64()
                .or_else(|| seconds.as_f64().map(|v| v as i64))?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0)
                .clamp(0, 999_999_999) as u32;

            DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
        }
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|v| v as i64))?;
            let parsed = if raw.abs() >= 100_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            };
            parsed.map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Converts identifier-style grouping keys (camelCase, snake_case) into
/// Title Case labels so raw field names never leak into category labels:
/// "creditCard" becomes "Credit Card".
pub fn normalize_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else {
            if ch.is_uppercase() && prev_lower {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase();
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
