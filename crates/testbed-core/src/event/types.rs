use std::any::Any;

use crate::context::ScopeId;
use crate::event::Event;
use crate::lifecycle::LifecycleState;

/// Raised when a test context reads a module property through the legacy
/// fallback path
#[derive(Debug, Clone, PartialEq)]
pub struct DeprecationEvent {
    /// Stable identifier of the deprecation
    pub id: String,
    /// Human readable message
    pub message: String,
    /// The property that was read
    pub property: String,
    /// Subject of the module whose context raised it
    pub subject_name: String,
}

impl DeprecationEvent {
    pub const NAME: &'static str = "testbed.deprecation";
}

impl Event for DeprecationEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Published every time a test module enters a lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub struct LifecyclePhaseEvent {
    pub subject_name: String,
    pub description: String,
    /// Name of the running test, when run through `run_test`
    pub test_name: Option<String>,
    pub phase: LifecycleState,
    /// Scope ID of the module
    pub module_scope: ScopeId,
}

impl LifecyclePhaseEvent {
    pub const NAME: &'static str = "testbed.lifecycle.phase";
}

impl Event for LifecyclePhaseEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
