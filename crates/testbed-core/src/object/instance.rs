use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::object::factory::DestroyHook;
use crate::object::Properties;
use crate::registry::name::FullName;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an instance, unique for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct InstanceInner {
    id: InstanceId,
    full_name: FullName,
    properties: RwLock<Properties>,
    injections: HashMap<String, Instance>,
    destroyed: AtomicBool,
    on_destroy: Option<DestroyHook>,
}

/// Handle to an object produced by a container.
///
/// Cloning clones the handle; both clones refer to the same object.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
         .field("id", &self.inner.id)
         .field("full_name", &self.inner.full_name)
         .field("injections", &self.inner.injections.keys().collect::<Vec<_>>())
         .field("destroyed", &self.is_destroyed())
         .finish()
    }
}

impl Instance {
    pub(crate) fn new(
        full_name: FullName,
        properties: Properties,
        injections: HashMap<String, Instance>,
        on_destroy: Option<DestroyHook>,
    ) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                id: InstanceId::next(),
                full_name,
                properties: RwLock::new(properties),
                injections,
                destroyed: AtomicBool::new(false),
                on_destroy,
            }),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    /// The name this instance was created for
    pub fn full_name(&self) -> &FullName {
        &self.inner.full_name
    }

    /// Read a property
    pub fn get(&self, key: &str) -> Option<Value> {
        let props = self.inner.properties.read().unwrap_or_else(|e| e.into_inner());
        props.get(key).cloned()
    }

    /// Read a property and deserialize it
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| serde_json::from_value(value).ok())
    }

    /// Read a string property
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|value| value.as_str().map(str::to_string))
    }

    /// Truthiness of a property: missing, `null`, `false`, `0` and `""` are false
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Write a property
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let mut props = self.inner.properties.write().unwrap_or_else(|e| e.into_inner());
        props.insert(key.to_string(), value.into());
    }

    /// Check whether a property is present
    pub fn has(&self, key: &str) -> bool {
        let props = self.inner.properties.read().unwrap_or_else(|e| e.into_inner());
        props.contains_key(key)
    }

    /// Snapshot of every property
    pub fn properties(&self) -> Properties {
        self.inner.properties.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The dependency injected under `property`
    pub fn injected(&self, property: &str) -> Option<Instance> {
        self.inner.injections.get(property).cloned()
    }

    /// Resolve a dotted path. The first segments may walk through injected
    /// dependencies; the rest index into property values.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if let Some(dep) = self.injected(head) {
            return match rest {
                Some(rest) => dep.get_path(rest),
                None => None,
            };
        }
        let mut value = self.get(head)?;
        if let Some(rest) = rest {
            for segment in rest.split('.') {
                value = match value {
                    Value::Object(mut map) => map.remove(segment)?,
                    Value::Array(items) => {
                        let idx: usize = segment.parse().ok()?;
                        items.into_iter().nth(idx)?
                    }
                    _ => return None,
                };
            }
        }
        Some(value)
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Mark destroyed and run the destroy hook. Returns false if the
    /// instance was already destroyed.
    pub(crate) fn destroy(&self) -> bool {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(hook) = &self.inner.on_destroy {
            hook(self);
        }
        true
    }

    /// Identity comparison
    pub fn same(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
