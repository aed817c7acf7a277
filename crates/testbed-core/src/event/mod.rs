//! # Testbed Core Events
//!
//! Synchronous notifications a host can observe without touching the
//! lifecycle: deprecation warnings raised by test contexts and the phase
//! changes of traced modules. Handlers subscribe by event name or by
//! concrete type through a [`SharedEventDispatcher`].
pub mod dispatcher;
pub mod error;
pub mod types;

use std::any::Any;
use std::fmt;

/// Type for event handler identifiers
pub type EventId = u64;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled and propagation should continue
    Continue,
    /// Event was handled and no further handler should see it
    Stop,
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the name of this event
    fn name(&self) -> &'static str;

    /// Clone this event
    fn clone_event(&self) -> Box<dyn Event>;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Handler invoked for events registered by name
pub type EventHandler = Box<dyn Fn(&dyn Event) -> EventResult + Send + Sync>;

pub use dispatcher::{EventDispatcher, SharedEventDispatcher, create_dispatcher, event_handler};
pub use types::{DeprecationEvent, LifecyclePhaseEvent};
