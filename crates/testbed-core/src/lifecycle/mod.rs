//! # Testbed Core Lifecycle
//!
//! The state machine that runs a module's tests:
//!
//! ```text
//! Idle → BeforeSetup → Setup → TestRunning → Teardown → AfterTeardown → Idle
//! ```
//!
//! Module definitions are validated up front ([`validate`]). Callbacks are
//! [`Hook`]s; failures are wrapped in [`LifecycleError::CallbackFailed`] and
//! re-raised only after `after_teardown` has run.
pub mod callbacks;
pub mod error;
pub mod hook;
pub mod module;
pub mod state;
pub mod validator;

pub use callbacks::{Helper, Integration, LifecycleCallbacks};
pub use error::{ConfigurationError, LifecycleError};
pub use hook::{async_hook, hook, BoxFuture, ContextHook, Hook, ModuleHook};
pub use module::{ModuleCache, TestModule};
pub use state::LifecycleState;
pub use validator::{validate, ModuleKind, ValidatedModule};
