//! Pilot: drive a [`Signature`] over an in-memory tree.
//!
//! The `Pilot` owns an engine and a `<body>`-rooted tree built from markup. It
//! records every reported failure so tests can assert on the sink as well as
//! on the returned `Interrupted`.

use std::cell::RefCell;
use std::rc::Rc;

use super::snapshot::{body_html, parse_body};
use crate::component::Value;
use crate::dom::{Dom, NodeId};
use crate::engine::{EngineConfig, Signature};
use crate::error::{Error, ErrorSink, Interrupted};

// ---------------------------------------------------------------------------
// ErrorRecorder
// ---------------------------------------------------------------------------

/// An [`ErrorSink`] that keeps every reported error. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct ErrorRecorder {
    errors: Rc<RefCell<Vec<Error>>>,
}

impl ErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors reported so far, oldest first.
    pub fn errors(&self) -> Vec<Error> {
        self.errors.borrow().clone()
    }

    /// Kinds of the errors reported so far.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.errors.borrow().iter().map(Error::kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
}

impl ErrorSink for ErrorRecorder {
    fn report(&self, error: &Error) {
        self.errors.borrow_mut().push(error.clone());
    }
}

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless engine driver for tests.
///
/// # Examples
///
/// ```ignore
/// let mut pilot = Pilot::new(r#"<div id="app"><greet name="Ada"></greet></div>"#);
/// pilot.signature().add_default::<Greet>("greet");
/// pilot.contact("#app").await?;
/// assert!(pilot.html().contains("Hello, Ada!"));
/// ```
pub struct Pilot {
    signature: Signature,
    dom: Dom,
    recorder: ErrorRecorder,
}

impl Pilot {
    /// Build a pilot over `markup` with a default engine.
    ///
    /// # Panics
    ///
    /// Panics if `markup` does not parse.
    pub fn new(markup: &str) -> Self {
        Self::with_config(markup, EngineConfig::default())
    }

    /// Build a pilot over `markup` with the given engine configuration.
    pub fn with_config(markup: &str, config: EngineConfig) -> Self {
        let dom = parse_body(markup).unwrap_or_else(|err| panic!("test markup does not parse: {err}"));
        let recorder = ErrorRecorder::new();
        let mut signature = Signature::with_config(config);
        signature.set_sink(recorder.clone());
        Self {
            signature,
            dom,
            recorder,
        }
    }

    // ── Engine ───────────────────────────────────────────────────────

    /// The engine, for registering components and plugins.
    pub fn signature(&mut self) -> &mut Signature {
        &mut self.signature
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Errors reported through the sink.
    pub fn recorder(&self) -> &ErrorRecorder {
        &self.recorder
    }

    // ── Passes ───────────────────────────────────────────────────────

    pub async fn contact(&mut self, selector: &str) -> Result<(), Interrupted> {
        self.signature.contact(&mut self.dom, selector).await
    }

    pub async fn update(&mut self, name: &str) -> Result<(), Interrupted> {
        self.signature.update(&mut self.dom, name).await
    }

    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, Error> {
        self.signature.invoke(name, args)
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Serialized `<body>` content.
    pub fn html(&self) -> String {
        body_html(&self.dom)
    }

    /// Serialized content of the first element matching `selector`.
    pub fn html_of(&self, selector: &str) -> Option<String> {
        let id = self.dom.query_selector(selector)?;
        Some(self.dom.inner_html(id))
    }

    /// Serialized root of the instance registered as `name`.
    pub fn ref_html(&self, name: &str) -> Option<String> {
        let id: NodeId = self.signature.lookup(name)?;
        Some(self.dom.outer_html(id))
    }
}
