//! Prop coercion: raw attribute strings to typed values.

use super::prop::{Prop, PropType};
use super::traits::Component;
use super::value::{Data, Value};
use crate::dom::Element;
use crate::error::Error;

/// Coerce one attribute according to its declaration.
///
/// `attr` is `None` when the attribute is absent. Returns `Ok(None)` when an
/// optional prop has no coercion rule and is left unset.
pub fn coerce(
    component: &str,
    name: &str,
    prop: &Prop,
    attr: Option<&str>,
) -> Result<Option<Value>, Error> {
    let required = || Error::PropIsRequired {
        component: component.to_owned(),
        prop: name.to_owned(),
    };

    let raw = match attr {
        None if prop.required => return Err(required()),
        None => return Ok(Some(Value::Null)),
        Some("") if prop.required => return Err(required()),
        // An empty attribute on an optional prop means "explicitly cleared".
        Some("") if prop.is_valid(&Value::String(String::new())) => return Ok(Some(Value::Null)),
        Some(raw) => raw,
    };

    let invalid = |value: Value| Error::InvalidValueForProperty {
        component: component.to_owned(),
        prop: name.to_owned(),
        value,
        attr: raw.to_owned(),
    };

    let value = match prop.kind {
        PropType::Boolean => Value::Boolean(!raw.is_empty()),
        PropType::Number => Value::Number(raw.trim().parse::<f64>().unwrap_or(f64::NAN)),
        PropType::String => Value::String(raw.to_owned()),
        PropType::Array => match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
            Ok(items) => Value::Array(items),
            Err(_) => return Err(invalid(Value::String(raw.to_owned()))),
        },
        PropType::Null if prop.required => {
            return Err(Error::UnsupportedTypeForProperty {
                component: component.to_owned(),
                prop: name.to_owned(),
                kind: prop.kind.to_string(),
            });
        }
        PropType::Null => return Ok(None),
    };

    if !prop.is_valid(&value) || !(prop.validate)(&value) {
        return Err(invalid(value));
    }
    Ok(Some(value))
}

/// Coerce every declared prop of `component` from the occurrence's attributes,
/// firing the prop hooks in declaration order.
pub fn parse_props(
    name: &str,
    component: &mut dyn Component,
    element: &Element,
) -> Result<Data, Error> {
    let mut data = Data::new();
    for (prop_name, prop) in component.props() {
        let attr = element.attr(&prop_name.to_ascii_lowercase());
        if let Some(value) = coerce(name, prop_name, &prop, attr)? {
            component.on_prop_parsed(prop_name, &prop, &value);
            data.insert(prop_name, value);
        }
    }
    component.on_props_parsed(&data);
    Ok(data)
}
