//! Typed prop values and the ordered prop-data map.

use std::fmt;

use indexmap::IndexMap;

/// A coerced prop value (or a contact argument / result).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    /// A JSON array, as parsed from an `array` prop.
    Array(Vec<serde_json::Value>),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[serde_json::Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Stringification used when a value is substituted into markup.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write_number(f, *n),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Array(items) => {
                let json = serde_json::Value::Array(items.clone());
                write!(f, "{json}")
            }
            Value::Null => f.write_str("null"),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<serde_json::Value>> for Value {
    fn from(items: Vec<serde_json::Value>) -> Self {
        Value::Array(items)
    }
}

/// Coerced props of one instance, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    values: IndexMap<String, Value>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// String value of a prop, if it was coerced to one.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn array(&self, name: &str) -> Option<&[serde_json::Value]> {
        self.get(name).and_then(Value::as_array)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_matches_markup_stringification() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(vec![json!(1), json!("a")]).to_string(), r#"[1,"a"]"#);
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert!(Value::Null.is_null());
        assert!(Value::from(1).as_str().is_none());
    }

    #[test]
    fn data_keeps_declaration_order() {
        let mut data = Data::new();
        data.insert("z", Value::from("last"));
        data.insert("a", Value::from(1));
        data.insert("m", Value::Null);
        let keys: Vec<&str> = data.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(data.str("z"), Some("last"));
        assert_eq!(data.number("a"), Some(1.0));
        assert!(data.boolean("a").is_none());
        assert!(data.contains("m"));
        assert_eq!(data.len(), 3);
    }
}
