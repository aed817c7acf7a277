//! # Testbed Core Registry Errors
//!
//! Errors raised while parsing full names or mutating a registry.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Malformed full name '{name}': {reason}")]
    MalformedFullName { name: String, reason: String },

    #[error("Registry lock '{component}' was poisoned")]
    Poisoned { component: String },
}
