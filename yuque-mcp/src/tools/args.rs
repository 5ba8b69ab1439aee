//! Tool call arguments

use serde_json::{Map, Value};

use crate::endpoint::Namespace;
use crate::error::{McpError, McpResult};

/// The `arguments` mapping of a `tools/call`.
///
/// Null entries are dropped on construction, so an explicit `null` and an
/// absent key read the same everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Absent or null → empty; anything but an object is rejected
    pub fn from_value(value: Value) -> McpResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(
                map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
            )),
            other => Err(McpError::ArgumentsNotObject(json_type(&other).to_string())),
        }
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Present, and not a blank string
    pub fn is_present(&self, key: &str) -> bool {
        match self.0.get(key) {
            None => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn str(&self, key: &str) -> McpResult<&str> {
        self.opt_str(key)
            .ok_or_else(|| McpError::invalid_argument(key, "expected a non-empty string"))
    }

    pub fn opt_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn int(&self, key: &str) -> McpResult<i64> {
        self.opt_int(key)
            .ok_or_else(|| McpError::invalid_argument(key, "expected an integer"))
    }

    /// Integral floats (`3.0`) are accepted
    pub fn opt_int(&self, key: &str) -> Option<i64> {
        let Value::Number(number) = self.0.get(key)? else {
            return None;
        };
        number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn opt_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Parse `key` as an `owner/slug` namespace
    pub fn namespace(&self, key: &str) -> McpResult<Namespace> {
        let raw = self.str(key)?;
        Namespace::parse(raw).ok_or_else(|| {
            McpError::invalid_argument(key, format!("expected 'owner/slug', got '{}'", raw))
        })
    }

    /// Copy the present keys into a request body
    pub fn pick(&self, keys: &[&str]) -> Map<String, Value> {
        keys.iter()
            .filter(|key| self.is_present(key))
            .filter_map(|key| self.0.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    /// Present scalar keys as query parameters
    pub fn query_pairs(&self, keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .filter(|key| self.is_present(key))
            .filter_map(|key| {
                let value = match self.0.get(*key)? {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.to_string(), value))
            })
            .collect()
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_empty_and_nulls_dropped() {
        assert_eq!(Arguments::from_value(Value::Null).unwrap(), Arguments::default());
        let args = Arguments::from_value(json!({"a": null, "b": 1})).unwrap();
        assert!(args.get("a").is_none());
        assert_eq!(args.opt_int("b"), Some(1));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Arguments::from_value(json!("login")).unwrap_err();
        assert!(matches!(err, McpError::ArgumentsNotObject(ref t) if t == "string"));
    }

    #[test]
    fn test_blank_string_is_not_present() {
        let args = Arguments::from_value(json!({"title": "  ", "content": "x"})).unwrap();
        assert!(!args.is_present("title"));
        assert!(args.is_present("content"));
        assert!(args.opt_str("title").is_none());
    }

    #[test]
    fn test_integral_float_is_int() {
        let args = Arguments::from_value(json!({"id": 12.0, "frac": 1.5})).unwrap();
        assert_eq!(args.int("id").unwrap(), 12);
        assert!(args.int("frac").is_err());
    }

    #[test]
    fn test_namespace_shape() {
        let args = Arguments::from_value(json!({"ok": "a/b", "bad": "ab"})).unwrap();
        assert_eq!(args.namespace("ok").unwrap().slug(), "b");
        let err = args.namespace("bad").unwrap_err();
        assert!(err.to_string().contains("owner/slug"));
    }

    #[test]
    fn test_pick_and_query_pairs_skip_absent() {
        let args = Arguments::from_value(json!({"name": "kb", "public": 0, "slug": ""})).unwrap();
        let body = args.pick(&["name", "slug", "description", "public"]);
        assert_eq!(Value::Object(body), json!({"name": "kb", "public": 0}));

        let pairs = args.query_pairs(&["name", "public", "page"]);
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "kb".to_string()),
                ("public".to_string(), "0".to_string())
            ]
        );
    }
}
