use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::object::Factory;
use crate::registry::error::RegistryError;
use crate::registry::name::FullName;
use crate::registry::resolver::{MapResolver, Resolver};

/// Per-test registry.
///
/// Resolution order: overrides registered during the test, then the custom
/// resolver when one is configured, otherwise the frozen default entries.
pub struct Registry {
    /// Snapshot of the module's default entries, shared read-only
    defaults: Arc<MapResolver>,
    /// Registrations made during this test
    overrides: HashMap<FullName, Arc<Factory>>,
    /// Custom resolver replacing default resolution
    resolver: Option<Arc<dyn Resolver>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
         .field("defaults", &self.defaults.len())
         .field("overrides", &self.override_names())
         .field("custom_resolver", &self.resolver.is_some())
         .finish()
    }
}

impl Registry {
    /// Create a registry over a snapshot of default entries
    pub fn new(defaults: Arc<MapResolver>, resolver: Option<Arc<dyn Resolver>>) -> Self {
        Self {
            defaults,
            overrides: HashMap::new(),
            resolver,
        }
    }

    /// Registry with no defaults and no custom resolver
    pub fn empty() -> Self {
        Self::new(Arc::new(MapResolver::new()), None)
    }

    /// Register (or replace) an override for `name`, scoped to this registry
    pub fn register(&mut self, name: &str, factory: impl Into<Arc<Factory>>) -> Result<Option<Arc<Factory>>, RegistryError> {
        let name = FullName::parse(name)?;
        log::debug!("Registering override for {}", name);
        Ok(self.register_name(name, factory.into()))
    }

    /// Register an already parsed name
    pub fn register_name(&mut self, name: FullName, factory: Arc<Factory>) -> Option<Arc<Factory>> {
        self.overrides.insert(name, factory)
    }

    /// Resolve `name` to a factory; `None` means not registered anywhere
    pub fn resolve(&self, name: &FullName) -> Option<Arc<Factory>> {
        if let Some(factory) = self.overrides.get(name) {
            return Some(factory.clone());
        }
        match &self.resolver {
            Some(resolver) => resolver.resolve(name),
            None => self.defaults.resolve(name),
        }
    }

    /// Check if `name` resolves to anything
    pub fn is_registered(&self, name: &FullName) -> bool {
        self.resolve(name).is_some()
    }

    /// Check if `name` was registered as an override in this registry
    pub fn has_override(&self, name: &FullName) -> bool {
        self.overrides.contains_key(name)
    }

    /// Names registered as overrides, sorted
    pub fn override_names(&self) -> Vec<FullName> {
        let mut names: Vec<FullName> = self.overrides.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a custom resolver replaces the default entries
    pub fn has_custom_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// The default entries this registry was built from
    pub fn defaults(&self) -> &MapResolver {
        &self.defaults
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
    }
}
