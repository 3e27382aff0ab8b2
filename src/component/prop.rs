//! Prop descriptors: declared type, required-ness, custom validation.

use std::fmt;

use super::value::Value;

/// Semantic type of a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropType {
    String,
    Number,
    Boolean,
    Array,
    Null,
}

impl PropType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
            PropType::Array => "array",
            PropType::Null => "null",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn accept_all(_: &Value) -> bool {
    true
}

/// Declaration of a single prop.
///
/// Immutable once built; components return the same declarations from
/// [`Component::props`](super::Component::props) on every call.
#[derive(Clone, Copy)]
pub struct Prop {
    pub kind: PropType,
    /// Defaults to `true`.
    pub required: bool,
    /// Runs after [`Prop::is_valid`] passes. Defaults to accept-all.
    pub validate: fn(&Value) -> bool,
}

impl Prop {
    /// A required prop of the given type.
    pub fn new(kind: PropType) -> Self {
        Self {
            kind,
            required: true,
            validate: accept_all,
        }
    }

    pub fn string() -> Self {
        Self::new(PropType::String)
    }

    pub fn number() -> Self {
        Self::new(PropType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(PropType::Boolean)
    }

    pub fn array() -> Self {
        Self::new(PropType::Array)
    }

    /// Mark the prop as optional (builder).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the custom validator (builder).
    pub fn validate(mut self, validate: fn(&Value) -> bool) -> Self {
        self.validate = validate;
        self
    }

    /// Whether `value` has the declared type. Numbers must not be NaN.
    pub fn is_valid(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (PropType::String, Value::String(_)) => true,
            (PropType::Number, Value::Number(n)) => !n.is_nan(),
            (PropType::Boolean, Value::Boolean(_)) => true,
            (PropType::Array, Value::Array(_)) => true,
            (PropType::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prop")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_required_and_accepting() {
        let prop = Prop::string();
        assert!(prop.required);
        assert!((prop.validate)(&Value::Null));
        assert!(!Prop::number().optional().required);
    }

    #[test]
    fn is_valid_agrees_with_type() {
        assert!(Prop::string().is_valid(&Value::from("")));
        assert!(!Prop::string().is_valid(&Value::from(1)));
        assert!(Prop::number().is_valid(&Value::from(1.5)));
        assert!(!Prop::number().is_valid(&Value::Number(f64::NAN)));
        assert!(Prop::boolean().is_valid(&Value::from(false)));
        assert!(Prop::array().is_valid(&Value::Array(vec![])));
        assert!(Prop::new(PropType::Null).is_valid(&Value::Null));
        assert!(!Prop::new(PropType::Null).is_valid(&Value::from("null")));
    }

    #[test]
    fn custom_validator() {
        let prop = Prop::number().validate(|v| v.as_f64().is_some_and(|n| n > 0.0));
        assert!((prop.validate)(&Value::from(2)));
        assert!(!(prop.validate)(&Value::from(-2)));
    }

    #[test]
    fn type_names() {
        assert_eq!(PropType::Array.to_string(), "array");
        assert_eq!(PropType::Boolean.as_str(), "boolean");
    }
}
