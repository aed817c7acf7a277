use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::DeprecationPolicy;
use crate::container::error::ContainerError;
use crate::container::Container;
use crate::context::inject::Injector;
use crate::context::ScopeId;
use crate::event::{DeprecationEvent, SharedEventDispatcher};
use crate::kernel::constants::{CONTEXT_LABEL_PREFIX, MODULE_PROPERTY_DEPRECATION_ID};
use crate::kernel::error::Result;
use crate::lifecycle::callbacks::LifecycleCallbacks;
use crate::lifecycle::error::LifecycleError;
use crate::object::{Factory, Instance, Properties};
use crate::registry::name::FullName;

/// A property set on a test context
#[derive(Debug, Clone)]
pub enum ContextValue {
    Value(Value),
    Instance(Instance),
}

/// Everything a context needs from the module that adopted it
pub(crate) struct ContextBinding {
    pub(crate) subject_name: FullName,
    pub(crate) description: String,
    pub(crate) is_integration: bool,
    pub(crate) container: Container,
    pub(crate) callbacks: Arc<LifecycleCallbacks>,
    pub(crate) events: SharedEventDispatcher,
    pub(crate) deprecations: DeprecationPolicy,
}

/// Receiver of `setup`, the test body and `teardown`.
///
/// A context is bound to one test at a time. Modules build one per test;
/// hosts that embed the lifecycle in their own hooks can create a
/// [`detached`](TestContext::detached) context and hand it to
/// [`TestModule::set_context`](crate::lifecycle::TestModule::set_context).
pub struct TestContext {
    scope_id: ScopeId,
    binding: Option<ContextBinding>,
    /// Properties set explicitly on the context
    properties: HashMap<String, ContextValue>,
    /// Memoized subject
    subject: Option<Instance>,
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.properties.keys().collect();
        keys.sort();
        f.debug_struct("TestContext")
         .field("scope_id", &self.scope_id)
         .field("subject_name", &self.subject_name())
         .field("properties", &keys)
         .field("subject_created", &self.subject.is_some())
         .finish()
    }
}

impl fmt::Display for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(binding) => write!(f, "{}{}", CONTEXT_LABEL_PREFIX, binding.subject_name),
            None => f.write_str("test context (unbound)"),
        }
    }
}

impl TestContext {
    /// A context not yet adopted by any module
    pub fn detached() -> Self {
        Self {
            scope_id: ScopeId::next(),
            binding: None,
            properties: HashMap::new(),
            subject: None,
        }
    }

    pub(crate) fn bind(&mut self, binding: ContextBinding) {
        self.subject = None;
        self.binding = Some(binding);
    }

    /// Drop the binding and every property. Returns the subject, if one was
    /// created, so the module can keep it for post-teardown checks.
    pub(crate) fn release(&mut self) -> Option<Instance> {
        self.binding = None;
        self.properties.clear();
        self.subject.take()
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    fn binding(&self, operation: &str) -> Result<&ContextBinding> {
        self.binding.as_ref().ok_or_else(|| {
            LifecycleError::ContextUnbound { operation: operation.to_string() }.into()
        })
    }

    /// Name of the module's subject, when bound
    pub fn subject_name(&self) -> Option<&FullName> {
        self.binding.as_ref().map(|b| &b.subject_name)
    }

    /// Read-only view of the module's callbacks, when bound
    pub fn callbacks(&self) -> Option<&LifecycleCallbacks> {
        self.binding.as_ref().map(|b| b.callbacks.as_ref())
    }

    /// The container of the current test
    pub fn container(&self) -> Result<&Container> {
        Ok(&self.binding("container")?.container)
    }

    /// The owner of the context itself
    pub fn get_owner(&self) -> Result<Container> {
        Ok(self.binding("get_owner")?.container.clone())
    }

    /// The owner of `instance`, if the current container produced it
    pub fn owner_of(&self, instance: &Instance) -> Option<Container> {
        self.binding.as_ref().and_then(|b| b.container.owner_of(instance))
    }

    /// The subject under test, created on first call
    pub fn subject(&mut self) -> Result<Instance> {
        self.subject_with(Value::Null)
    }

    /// Like [`subject`](Self::subject) but applies `overrides` (a JSON object)
    /// when the subject is created. Once the subject exists, later overrides
    /// are ignored.
    pub fn subject_with(&mut self, overrides: Value) -> Result<Instance> {
        if let Some(subject) = &self.subject {
            return Ok(subject.clone());
        }
        let binding = self.binding("subject")?;
        let overrides = match overrides {
            Value::Null => Properties::new(),
            Value::Object(map) => map,
            other => {
                return Err(ContainerError::InstantiationFailed {
                    name: binding.subject_name.to_string(),
                    reason: format!("subject overrides must be a JSON object, got {}", other),
                }
                .into());
            }
        };
        let subject = binding.container.create(&binding.subject_name, overrides)?;
        log::debug!("Created subject {} {}", binding.subject_name, subject.id());
        self.subject = Some(subject.clone());
        Ok(subject)
    }

    /// The subject if it has been created in this test
    pub fn subject_if_created(&self) -> Option<&Instance> {
        self.subject.as_ref()
    }

    /// Register a factory for the rest of this test
    pub fn register(&self, name: &str, factory: impl Into<Arc<Factory>>) -> Result<()> {
        self.binding("register")?.container.register(name, factory)?;
        Ok(())
    }

    /// Look a name up in the test's container
    pub fn lookup(&self, name: &str) -> Result<Option<Instance>> {
        Ok(self.binding("lookup")?.container.lookup(name)?)
    }

    /// Start an injection: `ctx.inject().service("store")`
    pub fn inject(&mut self) -> Injector<'_> {
        Injector::new(self)
    }

    /// Set a property on the context
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), ContextValue::Value(value.into()));
    }

    /// Store an instance on the context
    pub fn set_instance(&mut self, key: &str, instance: Instance) {
        self.properties.insert(key.to_string(), ContextValue::Instance(instance));
    }

    /// Remove a property set on the context
    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.properties.remove(key)
    }

    /// Whether `key` was set on the context itself
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Read a value.
    ///
    /// Properties set on the context win and never warn. Otherwise module
    /// properties (`subjectName`, `description`, `isIntegration`) and the
    /// callbacks' `properties` are consulted, raising a deprecation warning
    /// when one matches. Instance-valued properties are read with
    /// [`get_instance`](Self::get_instance).
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(own) = self.properties.get(key) {
            return match own {
                ContextValue::Value(value) => Some(value.clone()),
                ContextValue::Instance(_) => None,
            };
        }
        let binding = self.binding.as_ref()?;
        let value = module_property(binding, key)?;
        self.emit_deprecation(binding, key);
        Some(value)
    }

    /// Read an instance stored on the context
    pub fn get_instance(&self, key: &str) -> Option<Instance> {
        match self.properties.get(key)? {
            ContextValue::Instance(instance) => Some(instance.clone()),
            ContextValue::Value(_) => None,
        }
    }

    /// Resolve a dotted path such as `blah.purpose`, walking through stored
    /// instances and JSON values
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if let Some(instance) = self.get_instance(head) {
            return rest.and_then(|rest| instance.get_path(rest));
        }
        let mut value = self.get(head)?;
        if let Some(rest) = rest {
            for segment in rest.split('.') {
                value = value.get(segment)?.clone();
            }
        }
        Some(value)
    }

    /// Call a helper declared on the callbacks with this context as receiver
    pub fn call_helper(&self, name: &str) -> Result<Value> {
        let helper = self
            .binding("call_helper")?
            .callbacks
            .helper(name)
            .ok_or_else(|| LifecycleError::UnknownHelper { name: name.to_string() })?;
        helper(self)
    }

    fn emit_deprecation(&self, binding: &ContextBinding, key: &str) {
        let message = format!(
            "Accessing the test module property \"{}\" from a callback is deprecated.",
            key
        );
        if binding.deprecations == DeprecationPolicy::Log {
            log::warn!("DEPRECATION: {} [deprecation id: {}]", message, MODULE_PROPERTY_DEPRECATION_ID);
        }
        let event = DeprecationEvent {
            id: MODULE_PROPERTY_DEPRECATION_ID.to_string(),
            message,
            property: key.to_string(),
            subject_name: binding.subject_name.to_string(),
        };
        if let Err(e) = binding.events.dispatch(&event) {
            log::warn!("Failed to publish deprecation for '{}': {}", key, e);
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::detached()
    }
}

fn module_property(binding: &ContextBinding, key: &str) -> Option<Value> {
    match key {
        "subjectName" => Some(Value::String(binding.subject_name.to_string())),
        "description" => Some(Value::String(binding.description.clone())),
        "isIntegration" => Some(Value::Bool(binding.is_integration)),
        _ => binding.callbacks.property(key).cloned(),
    }
}
