//! # Testbed Core Container
//!
//! A [`Container`] is the per-test scope: it looks names up through the
//! test's [`Registry`](crate::registry::Registry), caches singletons, records
//! every instance it produced so it can answer owner queries, and destroys
//! them all when the test ends.
pub mod error;
pub mod scope;

pub use error::ContainerError;
pub use scope::{Container, ContainerId, Visibility};
