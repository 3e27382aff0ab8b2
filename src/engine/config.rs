//! Engine configuration.

/// Default nesting limit for component resolution.
///
/// Each level of nesting costs a chain of boxed futures on the polling
/// thread's stack; 64 levels fit comfortably in a 2 MiB thread even in debug
/// builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for a [`Signature`](super::Signature) engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest component nesting a pass may reach before failing with
    /// `stack-overflow`.
    pub max_depth: usize,
    /// Prefix of generated ref names.
    pub ref_prefix: String,
    /// Trim captured inner markup before handing it to components.
    pub trim_content: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            ref_prefix: "ref".to_owned(),
            trim_content: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit (builder).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the generated ref prefix (builder).
    pub fn with_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    /// Toggle content trimming (builder).
    pub fn with_trim_content(mut self, trim: bool) -> Self {
        self.trim_content = trim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.ref_prefix, "ref");
        assert!(config.trim_content);
    }

    #[test]
    fn builders_chain() {
        let config = EngineConfig::new()
            .with_max_depth(8)
            .with_ref_prefix("cmp")
            .with_trim_content(false);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.ref_prefix, "cmp");
        assert!(!config.trim_content);
    }
}
