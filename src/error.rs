//! Failure taxonomy for resolution passes and the single reporting channel.
//!
//! Every failure the engine can produce is an [`Error`] value. It is built at
//! the point of detection, returned unchanged up to the entry point, handed to
//! the configured [`ErrorSink`] once, and finally surfaced as [`Interrupted`].

use std::fmt;

use crate::component::Value;

/// A structured failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The root locator matched nothing.
    ElementNotFound { selector: String },
    /// A required attribute was missing or empty.
    PropIsRequired { component: String, prop: String },
    /// The declared type has no coercion rule for the given attribute.
    UnsupportedTypeForProperty {
        component: String,
        prop: String,
        kind: String,
    },
    /// The coerced value failed the type check or custom validation.
    InvalidValueForProperty {
        component: String,
        prop: String,
        value: Value,
        attr: String,
    },
    /// Render output did not normalize to exactly one element.
    MultipleRootElements { component: String, elements: String },
    /// A ref name was already taken.
    RefCollision { reference: String, component: String },
    /// A deferred render rejected.
    RenderAsyncFailed { component: String, err: String },
    /// Component nesting exceeded the configured depth.
    StackOverflow { err: String },
    Unknown { err: String },
    /// Any other fault, attributed to a component.
    UnknownFrom { from: String, err: String },
}

impl Error {
    /// Stable kebab-case identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ElementNotFound { .. } => "element-not-found",
            Error::PropIsRequired { .. } => "prop-is-required",
            Error::UnsupportedTypeForProperty { .. } => "unsupported-type-for-property",
            Error::InvalidValueForProperty { .. } => "invalid-value-for-property",
            Error::MultipleRootElements { .. } => "multiple-root-elements",
            Error::RefCollision { .. } => "ref-collision",
            Error::RenderAsyncFailed { .. } => "render-async-failed",
            Error::StackOverflow { .. } => "stack-overflow",
            Error::Unknown { .. } => "unknown",
            Error::UnknownFrom { .. } => "unknown-from",
        }
    }

    /// Message template; each `#field` is replaced by the matching field.
    pub fn template(&self) -> &'static str {
        match self {
            Error::ElementNotFound { .. } => "Element not found for selector: #selector",
            Error::PropIsRequired { .. } => {
                "Property '#prop' in component '#component' is required but not provided."
            }
            Error::UnsupportedTypeForProperty { .. } => {
                "Unsupported type for property '#prop' in component '#component': #type"
            }
            Error::InvalidValueForProperty { .. } => {
                "Invalid value for property '#prop' in component '#component': #value (value: #attr)"
            }
            Error::MultipleRootElements { .. } => {
                "Component '#component' must render a single root element. \n\t#elements"
            }
            Error::RefCollision { .. } => {
                "Ref collision detected for ref '#ref' in component '#component'."
            }
            Error::RenderAsyncFailed { .. } => {
                "Asynchronous render failed in component '#component': #err"
            }
            Error::StackOverflow { .. } => {
                "Maximum recursion depth exceeded while rendering: #err"
            }
            Error::Unknown { .. } => "An unknown error occurred: #err",
            Error::UnknownFrom { .. } => "An unknown error occurred in component '#from': #err",
        }
    }

    /// `(placeholder, value)` pairs for [`Error::template`].
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Error::ElementNotFound { selector } => vec![("selector", selector.clone())],
            Error::PropIsRequired { component, prop } => {
                vec![("component", component.clone()), ("prop", prop.clone())]
            }
            Error::UnsupportedTypeForProperty {
                component,
                prop,
                kind,
            } => vec![
                ("component", component.clone()),
                ("prop", prop.clone()),
                ("type", kind.clone()),
            ],
            Error::InvalidValueForProperty {
                component,
                prop,
                value,
                attr,
            } => vec![
                ("component", component.clone()),
                ("prop", prop.clone()),
                ("value", value.to_string()),
                ("attr", attr.clone()),
            ],
            Error::MultipleRootElements {
                component,
                elements,
            } => vec![("component", component.clone()), ("elements", elements.clone())],
            Error::RefCollision {
                reference,
                component,
            } => vec![("ref", reference.clone()), ("component", component.clone())],
            Error::RenderAsyncFailed { component, err } => {
                vec![("component", component.clone()), ("err", err.clone())]
            }
            Error::StackOverflow { err } | Error::Unknown { err } => vec![("err", err.clone())],
            Error::UnknownFrom { from, err } => {
                vec![("from", from.clone()), ("err", err.clone())]
            }
        }
    }

    /// Human-readable message: the template with every `#field` substituted.
    pub fn message(&self) -> String {
        substitute(self.template(), &self.fields())
    }
}

/// Replace `#name` placeholders in one left-to-right scan, so substituted text
/// is never rescanned.
fn substitute(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(hash) = rest.find('#') {
        out.push_str(&rest[..hash]);
        let after = &rest[hash + 1..];
        let name_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        match fields.iter().find(|(name, _)| *name == &after[..name_len]) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[name_len..];
            }
            None => {
                out.push('#');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for Error {}

/// The final signal of a failed top-level operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rendering interrupted: {cause}")]
pub struct Interrupted {
    #[source]
    pub cause: Error,
}

/// Receives every structured failure exactly once.
pub trait ErrorSink {
    fn report(&self, error: &Error);
}

/// Default sink: logs the formatted message at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, error: &Error) {
        log::error!("[{}] {}", error.kind(), error.message());
    }
}

impl<F: Fn(&Error)> ErrorSink for F {
    fn report(&self, error: &Error) {
        self(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_substitute_fields() {
        let err = Error::PropIsRequired {
            component: "greet".into(),
            prop: "name".into(),
        };
        assert_eq!(
            err.message(),
            "Property 'name' in component 'greet' is required but not provided."
        );
        assert_eq!(err.to_string(), err.message());
        assert_eq!(err.kind(), "prop-is-required");
    }

    #[test]
    fn invalid_value_shows_value_and_attr() {
        let err = Error::InvalidValueForProperty {
            component: "counter".into(),
            prop: "start".into(),
            value: Value::Number(f64::NAN),
            attr: "ten".into(),
        };
        assert_eq!(
            err.message(),
            "Invalid value for property 'start' in component 'counter': NaN (value: ten)"
        );
    }

    #[test]
    fn type_placeholder_and_ref_placeholder() {
        let err = Error::UnsupportedTypeForProperty {
            component: "c".into(),
            prop: "p".into(),
            kind: "null".into(),
        };
        assert!(err.message().ends_with(": null"));
        let err = Error::RefCollision {
            reference: "x".into(),
            component: "c".into(),
        };
        assert_eq!(err.message(), "Ref collision detected for ref 'x' in component 'c'.");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let err = Error::ElementNotFound {
            selector: "#app".into(),
        };
        assert_eq!(err.message(), "Element not found for selector: #app");
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        assert_eq!(substitute("a #nope b", &[]), "a #nope b");
    }

    #[test]
    fn interrupted_wraps_cause() {
        let cause = Error::Unknown { err: "boom".into() };
        let signal = Interrupted { cause: cause.clone() };
        assert_eq!(
            signal.to_string(),
            "rendering interrupted: An unknown error occurred: boom"
        );
        assert_eq!(signal.cause, cause);
    }

    #[test]
    fn closure_sink() {
        let seen = std::cell::RefCell::new(Vec::new());
        let sink = |e: &Error| seen.borrow_mut().push(e.kind());
        sink.report(&Error::StackOverflow { err: "x".into() });
        assert_eq!(seen.into_inner(), vec!["stack-overflow"]);
    }
}
