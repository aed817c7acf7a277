//! # Testbed Core Fixture Surface
//!
//! The shared surface tests render into. A module captures the surface when a
//! test is set up and restores it during teardown, after the `teardown`
//! callback and before the container is destroyed.
use std::fmt;
use std::sync::{Arc, RwLock};

/// Something a test can leave dirty and the harness puts back
pub trait FixtureSurface: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Current content of the surface
    fn content(&self) -> String;

    /// Replace the content of the surface
    fn set_content(&self, content: &str);

    /// Capture the surface so it can be restored later
    fn snapshot(&self) -> String {
        self.content()
    }

    /// Put back a captured snapshot. Returns true if the content changed.
    fn restore(&self, snapshot: &str) -> bool {
        if self.content() == snapshot {
            return false;
        }
        self.set_content(snapshot);
        true
    }
}

/// Fixture surface held in memory. Clones share the same content.
#[derive(Clone)]
pub struct InMemoryFixture {
    name: String,
    content: Arc<RwLock<String>>,
}

impl fmt::Debug for InMemoryFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryFixture")
         .field("name", &self.name)
         .field("content", &self.content())
         .finish()
    }
}

impl InMemoryFixture {
    pub fn new(name: &str) -> Self {
        Self::with_content(name, "")
    }

    pub fn with_content(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: Arc::new(RwLock::new(content.to_string())),
        }
    }
}

impl Default for InMemoryFixture {
    fn default() -> Self {
        Self::new("testbed-fixture")
    }
}

impl FixtureSurface for InMemoryFixture {
    fn name(&self) -> &str {
        &self.name
    }

    fn content(&self) -> String {
        self.content.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_content(&self, content: &str) {
        let mut guard = self.content.write().unwrap_or_else(|e| e.into_inner());
        *guard = content.to_string();
    }
}
