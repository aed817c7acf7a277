//! # Testbed Core Event System Errors
//!
//! Errors raised by the event dispatcher.
use crate::event::EventId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Failed to unregister event handler with ID {id}: {reason}")]
    HandlerUnregistrationFailed {
        id: EventId,
        reason: String,
    },

    #[error("Attempted to operate on a poisoned event dispatcher component: {component}")]
    DispatcherPoisoned {
        component: String,
    },
}
