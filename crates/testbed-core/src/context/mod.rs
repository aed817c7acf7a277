//! # Testbed Core Test Context
//!
//! The object bound to `setup`, the test body and `teardown`. It memoizes the
//! subject, forwards registrations to the test's container, injects
//! dependencies as properties, and reads through to module properties with a
//! deprecation warning.
pub mod inject;
pub mod test_context;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use inject::Injector;
pub use test_context::{ContextValue, TestContext};
pub(crate) use test_context::ContextBinding;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a callback receiver (a test module or a test context)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    pub(crate) fn next() -> Self {
        ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}
