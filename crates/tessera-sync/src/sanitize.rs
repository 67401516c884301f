//! Log-safe scrubbing of captured values.

use serde_json::Value;

/// Key fragments whose values are never written to logs.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "secret",
    "token",
    "credential",
    "authorization",
];

const REDACTED: &str = "***";

/// Recursively scrub a JSON value for structured-logging capture.
///
/// Values under keys that look secret-bearing are replaced with `***`;
/// arrays and nested objects are walked. Everything else passes through
/// unchanged, so the result is safe to attach to a log event or an audit
/// record.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| {
                    if is_sensitive_key(&key) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, sanitize_value(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        other => other,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|fragment| key.contains(fragment))
}
