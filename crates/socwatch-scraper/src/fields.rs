//! Ordered-fallback field reader over untyped scraper items.
//!
//! Each accessor takes a list of candidate keys and returns the first one that
//! is present with a usable value. `null` and values of the wrong JSON type
//! count as absent, so a later key still gets its chance.

use serde_json::Value;

/// Borrowed view over one JSON object from the scraper.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    value: &'a Value,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// First present, non-null value among `keys`, any JSON type.
    #[must_use]
    pub fn raw(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find(|v| !v.is_null())
    }

    /// First string value among `keys`. Empty strings are kept.
    #[must_use]
    pub fn string(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(Value::as_str)
            .map(str::to_owned)
    }

    /// First integer among `keys`. Floats are truncated toward zero;
    /// numeric strings (`"1200"`) are accepted.
    #[must_use]
    pub fn int(&self, keys: &[&str]) -> Option<i64> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(as_int)
    }

    /// First number among `keys`, as `f64`.
    #[must_use]
    pub fn float(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(Value::as_f64)
    }

    /// First boolean among `keys`.
    #[must_use]
    pub fn bool(&self, keys: &[&str]) -> Option<bool> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(Value::as_bool)
    }

    /// First array among `keys`, including empty ones.
    #[must_use]
    pub fn array(&self, keys: &[&str]) -> Option<&'a Vec<Value>> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(Value::as_array)
    }

    /// First non-empty array among `keys`.
    #[must_use]
    pub fn non_empty_array(&self, keys: &[&str]) -> Option<&'a Vec<Value>> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .filter_map(Value::as_array)
            .find(|a| !a.is_empty())
    }

    /// First identifier among `keys`: strings as-is, integers rendered in
    /// decimal. Empty strings are skipped.
    #[must_use]
    pub fn id(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Nested object under `key`, for dotted lookups like `location.name`.
    #[must_use]
    pub fn nested(&self, key: &str) -> Option<Fields<'a>> {
        self.value
            .get(key)
            .filter(|v| v.is_object())
            .map(Fields::new)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
