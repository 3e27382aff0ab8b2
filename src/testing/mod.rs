//! Test helpers: a markup-driving Pilot, an error recorder and snapshot
//! rendering.
//!
//! Use the [`Pilot`] to mount markup with a [`Signature`](crate::engine::Signature)
//! and inspect the result. Use [`render_to_string`] for one-shot renders in
//! snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::{ErrorRecorder, Pilot};
pub use snapshot::{normalize_whitespace, render_to_string};
