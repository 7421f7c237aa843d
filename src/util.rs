//! Small helpers for building API requests.

use serde_json::{Map, Value};

/// True only for a JSON object without keys.
pub fn is_empty_obj(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

/// Serializes pairs as a query string, keeping their order.
///
/// Values are percent-encoded, keys are written as given, and the result
/// always starts with `?` (an empty input gives just `?`).
pub fn to_params<K, V, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), urlencoding::encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{}", joined)
}

/// [`to_params`] for a JSON object. Strings are used as is; other values
/// are written in their JSON form (`null`, `true`, `42`, ...).
pub fn to_params_json(map: &Map<String, Value>) -> String {
    to_params(map.iter().map(|(k, v)| {
        let v = match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (k.as_str(), v)
    }))
}
