//! # Testbed Core Object Model
//!
//! The minimal host object framework the harness runs on: a [`Factory`]
//! describes property defaults and injected dependencies, and an
//! [`Instance`] is what a container produces from it. Instances carry
//! identity, a JSON-valued property bag, their injected dependencies and a
//! destroyed flag. Ownership is tracked by the container, never stored on
//! the instance.
pub mod factory;
pub mod instance;

pub use factory::{DestroyHook, Factory, Initializer, Injection};
pub use instance::{Instance, InstanceId};

/// Property map used for factory defaults and subject overrides
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Turn a JSON value into a property map. Anything that is not an object
/// yields `None`.
pub fn properties(value: serde_json::Value) -> Option<Properties> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
