//! # Testbed Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] type.
//!
//! Every subsystem owns a typed error enum (registry, container, lifecycle,
//! event system, harness configuration). They all convert into [`Error`] so
//! hooks, test bodies and the runner can share one `Result` alias.
use std::result::Result as StdResult;

use crate::config::error::ConfigError;
use crate::container::error::ContainerError;
use crate::event::error::EventSystemError;
use crate::lifecycle::error::{ConfigurationError, LifecycleError};
use crate::lifecycle::LifecycleState;
use crate::registry::error::RegistryError;
use thiserror::Error as ThisError;

/// Crate-wide error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid full name or registry operation
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Lookup, instantiation or destruction failure inside a container
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Illegal lifecycle option combination, raised when a module is defined
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Lifecycle state machine failures, including failing callbacks
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Event dispatcher failures
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    /// Loading or parsing a harness configuration file failed
    #[error("Harness config error: {0}")]
    HarnessConfig(#[from] ConfigError),

    /// Generic error with message, typically an assertion failing in a test body
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// True when this is a definition-time configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// True when a lifecycle callback or test body failed
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, Error::Lifecycle(LifecycleError::CallbackFailed { .. }))
    }

    /// The lifecycle phase a callback failure happened in, if any
    pub fn failed_phase(&self) -> Option<LifecycleState> {
        match self {
            Error::Lifecycle(LifecycleError::CallbackFailed { phase, .. }) => Some(*phase),
            _ => None,
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
