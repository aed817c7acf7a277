//! # testbed-core
//!
//! A test-module lifecycle harness. Each test gets an isolated registry and
//! container, a lazily created subject, and a context its callbacks run
//! against; teardown and cleanup run even when the test fails.
pub mod config;
pub mod container;
pub mod context;
pub mod event;
pub mod fixture;
pub mod kernel;
pub mod lifecycle;
pub mod object;
pub mod registry;
pub mod suite;

pub use config::{DeprecationPolicy, HarnessConfig};
pub use container::Container;
pub use context::{ScopeId, TestContext};
pub use event::{DeprecationEvent, Event, EventResult, LifecyclePhaseEvent, SharedEventDispatcher};
pub use fixture::{FixtureSurface, InMemoryFixture};
pub use kernel::error::{Error, Result};
pub use lifecycle::{
    async_hook, hook, ContextHook, Hook, Integration, LifecycleCallbacks, LifecycleState,
    ModuleHook, ModuleKind, TestModule,
};
pub use object::{Factory, Instance};
pub use registry::{FullName, MapResolver, Resolver};
pub use suite::{Suite, SuiteReport, TestOutcome};

#[cfg(test)]
mod tests;
