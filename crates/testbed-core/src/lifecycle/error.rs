//! # Testbed Core Lifecycle Errors
//!
//! [`ConfigurationError`] is raised while a module is being defined and means
//! no module was created. [`LifecycleError`] covers everything that goes wrong
//! while a module is running.
use thiserror::Error;

use crate::kernel::error::Error;
use crate::lifecycle::state::LifecycleState;

/// Illegal combination of module options
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Module for '{subject}' declares `needs` together with `integration: true`; pick one")]
    NeedsWithIntegration { subject: String },

    #[error("`integration: legacy` is only supported for component integration modules (subject '{subject}')")]
    LegacyIntegrationUnsupported { subject: String },

    #[error("Invalid subject name '{name}': {reason}")]
    InvalidSubjectName { name: String, reason: String },

    #[error("Invalid `needs` entry '{name}': {reason}")]
    InvalidNeed { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: LifecycleState, to: LifecycleState },

    #[error("Lifecycle callback failed during {phase}: {source}")]
    CallbackFailed {
        phase: LifecycleState,
        #[source]
        source: Box<Error>,
    },

    #[error("Test context is not bound to a module, cannot {operation}")]
    ContextUnbound { operation: String },

    #[error("Cannot supply a test context while the module is in state {state}")]
    ContextInUse { state: LifecycleState },

    #[error("No helper named '{name}' is declared on the module callbacks")]
    UnknownHelper { name: String },
}

impl LifecycleError {
    /// Wrap a failure raised by a callback or test body
    pub fn callback_failed(phase: LifecycleState, source: Error) -> Self {
        LifecycleError::CallbackFailed { phase, source: Box::new(source) }
    }
}
