use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::object::Factory;
use crate::registry::error::RegistryError;
use crate::registry::name::FullName;

/// Turns a full name into a factory.
///
/// Returning `None` is a normal outcome: callers treat it as "not
/// registered", never as an error.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &FullName) -> Option<Arc<Factory>>;
}

impl<F> Resolver for F
where
    F: Fn(&FullName) -> Option<Arc<Factory>> + Send + Sync,
{
    fn resolve(&self, name: &FullName) -> Option<Arc<Factory>> {
        self(name)
    }
}

/// Map-backed resolver. Used for a module's default entries and for
/// hand-built custom resolvers.
#[derive(Clone, Default)]
pub struct MapResolver {
    entries: HashMap<FullName, Arc<Factory>>,
}

impl fmt::Debug for MapResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(FullName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("MapResolver")
         .field("entries", &names)
         .finish()
    }
}

impl MapResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous factory
    pub fn insert(
        &mut self,
        name: &str,
        factory: impl Into<Arc<Factory>>,
    ) -> Result<Option<Arc<Factory>>, RegistryError> {
        let name = FullName::parse(name)?;
        Ok(self.entries.insert(name, factory.into()))
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, factory: impl Into<Arc<Factory>>) -> Result<Self, RegistryError> {
        self.insert(name, factory)?;
        Ok(self)
    }

    /// Build a resolver from `(name, factory)` pairs
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, Factory)>,
        S: AsRef<str>,
    {
        let mut resolver = Self::new();
        for (name, factory) in entries {
            resolver.insert(name.as_ref(), factory)?;
        }
        Ok(resolver)
    }

    /// Get the factory registered under `name`
    pub fn get(&self, name: &FullName) -> Option<Arc<Factory>> {
        self.entries.get(name).cloned()
    }

    /// Check whether `name` has an entry
    pub fn contains(&self, name: &FullName) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an entry
    pub fn remove(&mut self, name: &FullName) -> Option<Arc<Factory>> {
        self.entries.remove(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<FullName> {
        let mut names: Vec<FullName> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Resolver for MapResolver {
    fn resolve(&self, name: &FullName) -> Option<Arc<Factory>> {
        self.get(name)
    }
}
