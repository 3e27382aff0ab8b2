//! Resolution engine: configuration, instances, refs, the recursive walk and
//! the `Signature` entry points.

pub mod config;
pub mod instance;
pub mod refs;
pub mod resolve;
pub mod signature;

pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
pub use instance::Instance;
pub use refs::{RefEntry, RefRegistry};
pub use resolve::{COMPONENT_ATTR, GROUPS_ATTR, REF_ATTR};
pub use signature::Signature;
