//! Runtime configuration options.

/// Options consulted by the dispatch machinery.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Cache operator specializations in dispatch cells. Turning this off
    /// forces the full resolution procedure on every call, which is useful
    /// when debugging handler tables.
    pub ops_cache: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { ops_cache: true }
    }
}
