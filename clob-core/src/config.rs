//! Engine configuration.
//!
//! Loading configuration from a file or environment is the embedding
//! application's job; this module only defines the typed shape the engine
//! accepts, in the spirit of a constructor an external config loader feeds.

/// Configuration for a [`crate::engine::Engine`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of the bounded trade journal ring buffer. Oldest trades are
    /// evicted once this many are held. Defaults to 10,000 per the spec.
    pub journal_capacity: usize,

    /// Default number of price levels returned by `depth()` when the
    /// caller doesn't specify one.
    pub default_depth: usize,

    /// Retention window, in microseconds, for terminated orders in the
    /// registry. `None` disables eviction (the default: matching the
    /// original implementation, which retains every order for the process
    /// lifetime). See `Engine::evict_older_than`.
    pub registry_retention_micros: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            journal_capacity: 10_000,
            default_depth: 10,
            registry_retention_micros: None,
        }
    }
}

impl EngineConfig {
    /// Construct a config with the given journal capacity, leaving other
    /// fields at their defaults.
    #[must_use]
    pub fn with_journal_capacity(journal_capacity: usize) -> Self {
        Self {
            journal_capacity,
            ..Self::default()
        }
    }
}
