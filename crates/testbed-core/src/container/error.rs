//! # Testbed Core Container Errors
//!
//! Lookup misses are not errors (`Ok(None)`); these are the failures that
//! are.
use thiserror::Error;

use crate::registry::error::RegistryError;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Container for '{subject}' has been destroyed; cannot look up '{name}'")]
    Destroyed { subject: String, name: String },

    #[error("Dependency cycle detected while instantiating '{name}'. Path: {path:?}")]
    DependencyCycle { name: String, path: Vec<String> },

    #[error("'{name}' injects '{dependency}' as '{property}', but it could not be resolved")]
    MissingDependency { name: String, property: String, dependency: String },

    #[error("No factory found for subject '{name}'")]
    SubjectNotFound { name: String },

    #[error("Failed to instantiate '{name}': {reason}")]
    InstantiationFailed { name: String, reason: String },

    #[error("Invalid name: {0}")]
    InvalidName(#[from] RegistryError),

    #[error("Attempted to operate on a poisoned container lock: {component}")]
    Poisoned { component: String },
}
