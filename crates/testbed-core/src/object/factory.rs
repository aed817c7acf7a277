use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::kernel::constants::SERVICE_KIND;
use crate::kernel::error::Result;
use crate::object::instance::Instance;
use crate::object::Properties;
use crate::registry::error::RegistryError;
use crate::registry::name::{normalize_identifier, FullName};

/// Runs once right after an instance is built, before anyone else sees it
pub type Initializer = Arc<dyn Fn(&Instance) -> Result<()> + Send + Sync>;

/// Runs when the owning container destroys the instance
pub type DestroyHook = Arc<dyn Fn(&Instance) + Send + Sync>;

/// A dependency the factory wants injected under `property`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    property: String,
    target: String,
}

impl Injection {
    /// Inject `target` (a full name) under `property`
    pub fn new(property: &str, target: &str) -> Self {
        Self {
            property: property.to_string(),
            target: target.to_string(),
        }
    }

    /// Inject a service whose name is derived from the property name:
    /// `otherThing` resolves `service:other-thing`.
    pub fn service(property: &str) -> Self {
        Self::new(property, &format!("{}:{}", SERVICE_KIND, normalize_identifier(property)))
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// The raw target name as declared
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Parse the target into a full name
    pub fn target_name(&self) -> std::result::Result<FullName, RegistryError> {
        FullName::parse(&self.target)
    }
}

/// Blueprint for instances: property defaults, injections and hooks.
///
/// Factories are singletons by default: a container caches the first
/// instance and hands it out for every later lookup in the same test.
#[derive(Clone)]
pub struct Factory {
    properties: Properties,
    injections: Vec<Injection>,
    singleton: bool,
    initializer: Option<Initializer>,
    on_destroy: Option<DestroyHook>,
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
         .field("properties", &self.properties)
         .field("injections", &self.injections)
         .field("singleton", &self.singleton)
         .field("has_initializer", &self.initializer.is_some())
         .field("has_destroy_hook", &self.on_destroy.is_some())
         .finish()
    }
}

impl Factory {
    /// An empty singleton factory
    pub fn object() -> Self {
        Self {
            properties: Properties::new(),
            injections: Vec::new(),
            singleton: true,
            initializer: None,
            on_destroy: None,
        }
    }

    /// A factory whose instances are never cached
    pub fn transient() -> Self {
        Self { singleton: false, ..Self::object() }
    }

    /// Set a default property value
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Merge a map of default properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Declare an injection of `target` under `property`
    pub fn inject(mut self, property: &str, target: &str) -> Self {
        self.injections.push(Injection::new(property, target));
        self
    }

    /// Declare a service injection with a name derived from `property`
    pub fn inject_service(mut self, property: &str) -> Self {
        self.injections.push(Injection::service(property));
        self
    }

    /// Run `init` on every new instance
    pub fn on_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&Instance) -> Result<()> + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(init));
        self
    }

    /// Run `hook` when an instance is destroyed
    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Instance) + Send + Sync + 'static,
    {
        self.on_destroy = Some(Arc::new(hook));
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn injections(&self) -> &[Injection] {
        &self.injections
    }

    /// Build an instance. `overrides` win over the factory defaults and
    /// `injected` must already be resolved by the caller.
    pub(crate) fn instantiate(
        &self,
        name: FullName,
        overrides: Properties,
        injected: HashMap<String, Instance>,
    ) -> Result<Instance> {
        let mut properties = self.properties.clone();
        properties.extend(overrides);

        let instance = Instance::new(name, properties, injected, self.on_destroy.clone());
        if let Some(init) = &self.initializer {
            init(&instance)?;
        }
        Ok(instance)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::object()
    }
}
