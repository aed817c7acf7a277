use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::TestContext;
use crate::kernel::error::Result;
use crate::lifecycle::hook::{ContextHook, ModuleHook};
use crate::object::Properties;
use crate::registry::resolver::Resolver;

/// Named function callable with the test context as receiver
pub type Helper = Arc<dyn Fn(&TestContext) -> Result<Value> + Send + Sync>;

/// How far lookups reach beyond the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integration {
    /// Only the subject, `needs` and overrides registered in the test
    #[default]
    Isolated,
    /// Everything the registry resolves
    Enabled,
    /// Component unit style for component integration modules; lookups
    /// stay isolated and `needs` apply
    Legacy,
}

/// The user-supplied part of a module definition.
///
/// Built once, validated when the module is defined, then shared read-only
/// with every test context of the module.
#[derive(Clone, Default)]
pub struct LifecycleCallbacks {
    before_setup: Option<ModuleHook>,
    setup: Option<ContextHook>,
    teardown: Option<ContextHook>,
    after_teardown: Option<ModuleHook>,
    needs: Vec<String>,
    integration: Integration,
    resolver: Option<Arc<dyn Resolver>>,
    properties: Properties,
    helpers: HashMap<String, Helper>,
}

impl fmt::Debug for LifecycleCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCallbacks")
         .field("before_setup", &self.before_setup.is_some())
         .field("setup", &self.setup.is_some())
         .field("teardown", &self.teardown.is_some())
         .field("after_teardown", &self.after_teardown.is_some())
         .field("needs", &self.needs)
         .field("integration", &self.integration)
         .field("resolver", &self.resolver.is_some())
         .field("properties", &self.properties)
         .field("helpers", &self.helper_names())
         .finish()
    }
}

impl LifecycleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_setup(mut self, hook: ModuleHook) -> Self {
        self.before_setup = Some(hook);
        self
    }

    pub fn setup(mut self, hook: ContextHook) -> Self {
        self.setup = Some(hook);
        self
    }

    pub fn teardown(mut self, hook: ContextHook) -> Self {
        self.teardown = Some(hook);
        self
    }

    pub fn after_teardown(mut self, hook: ModuleHook) -> Self {
        self.after_teardown = Some(hook);
        self
    }

    /// Names visible to an isolated module besides its subject
    pub fn needs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn integration(mut self, integration: Integration) -> Self {
        self.integration = integration;
        self
    }

    /// Resolve names through `resolver` instead of the module's defaults
    pub fn resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Declare a property readable from the context through the deprecated
    /// fallback
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_helper<F>(mut self, name: &str, helper: F) -> Self
    where
        F: Fn(&TestContext) -> Result<Value> + Send + Sync + 'static,
    {
        self.helpers.insert(name.to_string(), Arc::new(helper));
        self
    }

    pub fn before_setup_hook(&self) -> Option<&ModuleHook> {
        self.before_setup.as_ref()
    }

    pub fn setup_hook(&self) -> Option<&ContextHook> {
        self.setup.as_ref()
    }

    pub fn teardown_hook(&self) -> Option<&ContextHook> {
        self.teardown.as_ref()
    }

    pub fn after_teardown_hook(&self) -> Option<&ModuleHook> {
        self.after_teardown.as_ref()
    }

    /// Raw `needs` entries, in declaration order
    pub fn needed(&self) -> &[String] {
        &self.needs
    }

    pub fn integration_mode(&self) -> Integration {
        self.integration
    }

    pub fn custom_resolver(&self) -> Option<Arc<dyn Resolver>> {
        self.resolver.clone()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn helper(&self, name: &str) -> Option<Helper> {
        self.helpers.get(name).cloned()
    }

    /// Declared helper names, sorted
    pub fn helper_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
