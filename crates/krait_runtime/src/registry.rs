//! Mapping from runtime representations to operand handlers.
//!
//! The registry is written once at startup and read-only afterwards; the
//! dispatch machinery receives it explicitly rather than reaching for
//! ambient global state, so tests can run against a custom registry.

use std::rc::Rc;

use krait_core::{FastHashMap, Repr, fast_map_new};

use crate::config::RuntimeConfig;
use crate::ops::{OpsHandler, big_handler, float_handler, int_handler, str_handler, wide_handler};

pub struct OpsRegistry {
    handlers: FastHashMap<Repr, Rc<OpsHandler>>,
    config: RuntimeConfig,
}

impl OpsRegistry {
    /// A registry with the builtin numeric and string handlers installed.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut reg = Self::empty(config);
        reg.install_builtins();
        reg
    }

    /// A registry with no handlers at all. Callers register their own.
    pub fn empty(config: RuntimeConfig) -> Self {
        Self { handlers: fast_map_new(), config }
    }

    /// Assign a handler to a representation. Registration is append-only:
    /// a representation can be bound once, at startup.
    pub fn register(&mut self, repr: Repr, handler: Rc<OpsHandler>) {
        let prev = self.handlers.insert(repr, handler);
        assert!(prev.is_none(), "operations already registered for {repr:?}");
    }

    pub fn handler(&self, repr: Repr) -> Option<&Rc<OpsHandler>> {
        self.handlers.get(&repr)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn install_builtins(&mut self) {
        self.register(Repr::Int, int_handler());
        self.register(Repr::Wide, wide_handler());
        self.register(Repr::Big, big_handler());
        self.register(Repr::Float, float_handler());
        self.register(Repr::Str, str_handler());
    }
}

impl Default for OpsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
