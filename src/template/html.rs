//! Template values: static string segments interleaved with dynamic slots.

use std::fmt;

use crate::component::Value;

/// Start of a placeholder marker in skeleton markup (private-use code point).
pub(crate) const MARK_OPEN: char = '\u{E000}';
/// End of a placeholder marker in skeleton markup.
pub(crate) const MARK_CLOSE: char = '\u{E001}';

/// The marker text for placeholder `index`.
pub(crate) fn marker(index: usize) -> String {
    format!("{MARK_OPEN}{index}{MARK_CLOSE}")
}

/// A dynamic value substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Inserted as escaped text (or as attribute text).
    Text(String),
    /// Inserted as raw markup. Only create through [`unsafe_html`].
    Html(String),
}

impl Slot {
    /// The text a placeholder in attribute position is rewritten to.
    pub fn as_str(&self) -> &str {
        match self {
            Slot::Text(s) | Slot::Html(s) => s,
        }
    }
}

/// Mark `markup` as trusted: it is parsed and spliced in unescaped.
pub fn unsafe_html(markup: impl fmt::Display) -> Slot {
    Slot::Html(markup.to_string())
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Slot::Text(s.to_owned())
    }
}

impl From<String> for Slot {
    fn from(s: String) -> Self {
        Slot::Text(s)
    }
}

impl From<&String> for Slot {
    fn from(s: &String) -> Self {
        Slot::Text(s.clone())
    }
}

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Slot::Text(v.to_string())
    }
}

impl From<&Value> for Slot {
    fn from(v: &Value) -> Self {
        Slot::Text(v.to_string())
    }
}

macro_rules! slot_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for Slot {
            fn from(v: $t) -> Self {
                Slot::Text(v.to_string())
            }
        })*
    };
}

slot_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

/// A render result: static segments (the shape) plus one slot between each
/// pair of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    strings: &'static [&'static str],
    values: Vec<Slot>,
}

impl Template {
    /// Build a template.
    ///
    /// # Panics
    ///
    /// Panics if `strings.len() != values.len() + 1`.
    pub fn new(strings: &'static [&'static str], values: Vec<Slot>) -> Self {
        assert_eq!(
            strings.len(),
            values.len() + 1,
            "template has {} segments but {} values",
            strings.len(),
            values.len()
        );
        Self { strings, values }
    }

    /// A template with no dynamic values.
    pub fn fixed(markup: &'static [&'static str; 1]) -> Self {
        Self::new(markup, Vec::new())
    }

    pub fn strings(&self) -> &'static [&'static str] {
        self.strings
    }

    pub fn values(&self) -> &[Slot] {
        &self.values
    }

    /// Cache key: depends on the static segments only.
    pub fn shape_key(&self) -> String {
        self.strings.join(&MARK_OPEN.to_string())
    }

    /// Segments interleaved with placeholder markers, ready for parsing.
    pub(crate) fn skeleton_markup(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.strings.iter().enumerate() {
            if i > 0 {
                out.push_str(&marker(i - 1));
            }
            out.push_str(segment);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_key_ignores_values() {
        let a = Template::new(&["<p>", "</p>"], vec!["x".into()]);
        let b = Template::new(&["<p>", "</p>"], vec!["y".into()]);
        assert_eq!(a.shape_key(), b.shape_key());
        assert_ne!(a, b);
    }

    #[test]
    fn shape_key_distinguishes_segment_boundaries() {
        let a = Template::new(&["ab", ""], vec!["x".into()]);
        let b = Template::new(&["a", "b"], vec!["x".into()]);
        assert_ne!(a.shape_key(), b.shape_key());
    }

    #[test]
    fn skeleton_interleaves_markers() {
        let t = Template::new(&["<a href=\"", "\">", "</a>"], vec!["/x".into(), 3.into()]);
        assert_eq!(
            t.skeleton_markup(),
            format!("<a href=\"{}\">{}</a>", marker(0), marker(1))
        );
    }

    #[test]
    #[should_panic(expected = "template has 2 segments but 0 values")]
    fn count_mismatch_panics() {
        let _ = Template::new(&["<p>", "</p>"], Vec::new());
    }

    #[test]
    fn slot_conversions() {
        assert_eq!(Slot::from(2.5), Slot::Text("2.5".into()));
        assert_eq!(Slot::from(Value::Boolean(true)), Slot::Text("true".into()));
        assert_eq!(unsafe_html("<b>x</b>"), Slot::Html("<b>x</b>".into()));
        assert_eq!(unsafe_html("<i></i>").as_str(), "<i></i>");
    }
}
