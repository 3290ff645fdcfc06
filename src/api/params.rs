//! Request parameter sets.
//!
//! `Params` is the single shape shared by the transport (query-string
//! construction) and the query cache (key identity). Values are kept as
//! JSON so sparse filter structs can be converted straight through serde
//! without manual cleanup of absent fields.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::{Map, Value};

use super::ApiError;

/// An ordered parameter set with structural equality.
///
/// Construction canonicalizes nested objects (keys sorted recursively), so
/// two parameter sets with the same contents compare and hash identically
/// regardless of how or in what order they were built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Null values are kept here and dropped at
    /// query-string time, so callers can pass sparse filters verbatim.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), canonicalize(value.into()));
        self
    }

    /// Convert any serializable filter struct into a parameter set.
    ///
    /// The filter must serialize to a JSON object; anything else is a
    /// caller bug reported before dispatch.
    pub fn from_query<T: Serialize>(filter: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(filter)
            .map_err(|e| ApiError::Validation(format!("unserializable parameters: {e}")))?;
        match value {
            Value::Object(map) => Ok(Self(
                map.into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )),
            Value::Null => Ok(Self::default()),
            other => Err(ApiError::Validation(format!(
                "parameters must be an object, got {other}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Flatten into query-string pairs.
    ///
    /// Absent, null, and empty-string values are dropped - callers pass
    /// sparse filter objects and rely on this filtering. Arrays and nested
    /// objects have no query-string encoding and are rejected.
    pub fn query_pairs(&self) -> Result<Vec<(&str, String)>, ApiError> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            match value {
                Value::Null => continue,
                Value::String(s) if s.is_empty() => continue,
                Value::String(s) => pairs.push((key.as_str(), s.clone())),
                Value::Bool(b) => pairs.push((key.as_str(), b.to_string())),
                Value::Number(n) => pairs.push((key.as_str(), n.to_string())),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::Validation(format!(
                        "parameter '{key}' is not a scalar"
                    )));
                }
            }
        }
        Ok(pairs)
    }

    /// Hash of the canonical form, used by `QueryKey`.
    pub(crate) fn hash_canonical<H: Hasher>(&self, state: &mut H) {
        for (key, value) in &self.0 {
            key.hash(state);
            // Canonical form makes serialization stable across builds of
            // the same structural value.
            value.to_string().hash(state);
        }
    }
}

// JSON params never contain NaN, so structural equality is total.
impl Eq for Params {}

impl Hash for Params {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_canonical(state);
    }
}

/// Rebuild nested objects with sorted keys.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            let mut out = Map::with_capacity(sorted.len());
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filter {
        search: Option<String>,
        role: Option<String>,
        status: Option<String>,
    }

    #[test]
    fn test_sparse_filter_drops_null_and_empty() {
        let filter = Filter {
            search: Some(String::new()),
            role: None,
            status: Some("active".to_string()),
        };
        let params = Params::from_query(&filter).expect("filter is an object");
        let pairs = params.query_pairs().expect("scalars only");
        assert_eq!(pairs, vec![("status", "active".to_string())]);
    }

    #[test]
    fn test_structural_equality_ignores_build_order() {
        let a = Params::new().with("page", 1).with("status", "active");
        let b = Params::new().with("status", "active").with("page", 1);
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_nested_objects_are_canonicalized() {
        let a = Params::from_query(&json!({"range": {"from": 1, "to": 2}})).unwrap();
        let b = Params::from_query(&json!({"range": {"to": 2, "from": 1}})).unwrap();
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_non_scalar_query_value_is_rejected() {
        let params = Params::from_query(&json!({"ids": [1, 2, 3]})).unwrap();
        match params.query_pairs() {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("ids")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_filter_is_rejected() {
        match Params::from_query(&json!([1, 2])) {
            Err(ApiError::Validation(_)) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_numbers_and_bools_stringify() {
        let params = Params::new().with("page", 3).with("expired", false);
        let pairs = params.query_pairs().unwrap();
        assert_eq!(
            pairs,
            vec![("expired", "false".to_string()), ("page", "3".to_string())]
        );
    }
}
