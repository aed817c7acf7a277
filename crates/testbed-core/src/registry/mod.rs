//! # Testbed Core Registry
//!
//! Maps full names (`"kind:identifier"`) to [`Factory`](crate::object::Factory)
//! values. A module seeds a [`MapResolver`] with its default entries; every
//! test then gets a fresh [`Registry`] built from a frozen snapshot of those
//! defaults, optionally consulting a custom [`Resolver`], and records its own
//! overrides which vanish with the test.
pub mod error;
pub mod name;
pub mod resolver;
pub mod store;

pub use error::RegistryError;
pub use name::FullName;
pub use resolver::{MapResolver, Resolver};
pub use store::Registry;
