//! Redaction helpers so credentials never reach logs or error messages.

use reqwest::Url;
use serde_json::Value;

pub const REDACTED: &str = "[REDACTED]";

/// Key fragments treated as sensitive (matched case-insensitively).
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "apikey",
    "api_key",
    "api-key",
    "token",
    "secret",
    "authorization",
    "auth",
    "credential",
];

/// Max nesting walked by [`sanitize_value`].
const MAX_DEPTH: usize = 10;

pub fn is_sensitive(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| lower.contains(s))
}

/// Returns a copy of `value` with sensitive object keys redacted.
pub fn sanitize_value(value: &Value) -> Value {
    sanitize_at(value, 0)
}

fn sanitize_at(value: &Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::String("[MAX DEPTH]".to_string());
    }
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_sensitive(k) {
                        Value::String(REDACTED.to_string())
                    } else {
                        sanitize_at(v, depth + 1)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize_at(v, depth + 1)).collect()),
        other => other.clone(),
    }
}

/// Redacts userinfo passwords and sensitive query parameters.
///
/// Unparseable input is returned unchanged.
pub fn sanitize_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    if url.password().is_some() {
        let _ = url.set_password(Some(REDACTED));
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_sensitive(&k) { REDACTED.to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

/// Header pairs with sensitive values redacted, for debug logging.
pub fn sanitize_headers<'a, I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .map(|(k, v)| {
            let v = if is_sensitive(k) { REDACTED } else { v };
            (k.to_string(), v.to_string())
        })
        .collect()
}
