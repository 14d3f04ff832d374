//! Invoker registry — maps component kinds to boxed invoker
//! implementations.
//!
//! Resolution happens once per node at dispatch time; no runtime type
//! inspection is involved.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{builtin, ComponentInvoker, ComponentKind};

/// Lookup table from [`ComponentKind`] to an invoker implementation.
#[derive(Default)]
pub struct InvokerRegistry {
    invokers: HashMap<ComponentKind, Arc<dyn ComponentInvoker>>,
}

impl InvokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry wired with the built-in local invokers for all four kinds.
    /// Deployments targeting a remote integration platform replace these.
    pub fn builtin() -> Self {
        Self::new()
            .with(ComponentKind::Input, Arc::new(builtin::InputInvoker))
            .with(ComponentKind::Process, Arc::new(builtin::ProcessInvoker))
            .with(ComponentKind::Output, Arc::new(builtin::OutputInvoker))
            .with(ComponentKind::Decision, Arc::new(builtin::DecisionInvoker))
    }

    /// Register (or replace) the invoker for a kind.
    pub fn with(mut self, kind: ComponentKind, invoker: Arc<dyn ComponentInvoker>) -> Self {
        self.invokers.insert(kind, invoker);
        self
    }

    pub fn get(&self, kind: ComponentKind) -> Option<Arc<dyn ComponentInvoker>> {
        self.invokers.get(&kind).cloned()
    }
}
