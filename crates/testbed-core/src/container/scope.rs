use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::container::error::ContainerError;
use crate::object::{Factory, Instance, InstanceId, Properties};
use crate::registry::name::FullName;
use crate::registry::store::Registry;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Which names a lookup may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Every name the registry can resolve
    Integration,
    /// Only the subject, the listed needs and names overridden in this test
    Isolated { needs: HashSet<FullName> },
}

impl Visibility {
    /// Isolated visibility over a list of needs
    pub fn isolated<I: IntoIterator<Item = FullName>>(needs: I) -> Self {
        Visibility::Isolated { needs: needs.into_iter().collect() }
    }

    pub fn is_integration(&self) -> bool {
        matches!(self, Visibility::Integration)
    }
}

#[derive(Default)]
struct ContainerState {
    /// Singleton cache
    cache: HashMap<FullName, Instance>,
    /// Everything this container produced, in creation order
    owned: Vec<Instance>,
    /// Ownership index for owner queries
    owned_ids: HashSet<InstanceId>,
    destroyed: bool,
}

struct ContainerInner {
    id: ContainerId,
    subject_name: FullName,
    visibility: Visibility,
    registry: Mutex<Registry>,
    state: Mutex<ContainerState>,
}

/// Per-test scope over a registry. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
         .field("id", &self.inner.id)
         .field("subject", &self.inner.subject_name)
         .field("visibility", &self.inner.visibility)
         .field("destroyed", &self.is_destroyed())
         .finish()
    }
}

impl Container {
    /// Create a container for `subject_name` over `registry`
    pub fn new(subject_name: FullName, registry: Registry, visibility: Visibility) -> Self {
        let id = ContainerId(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed));
        log::debug!("Creating {} for {} ({:?})", id, subject_name, visibility);
        Self {
            inner: Arc::new(ContainerInner {
                id,
                subject_name,
                visibility,
                registry: Mutex::new(registry),
                state: Mutex::new(ContainerState::default()),
            }),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.inner.id
    }

    pub fn subject_name(&self) -> &FullName {
        &self.inner.subject_name
    }

    pub fn visibility(&self) -> &Visibility {
        &self.inner.visibility
    }

    fn state(&self) -> Result<MutexGuard<'_, ContainerState>, ContainerError> {
        self.inner.state.lock().map_err(|_| ContainerError::Poisoned {
            component: "state".to_string(),
        })
    }

    fn registry(&self) -> Result<MutexGuard<'_, Registry>, ContainerError> {
        self.inner.registry.lock().map_err(|_| ContainerError::Poisoned {
            component: "registry".to_string(),
        })
    }

    /// Register an override for this test. A cached instance under the same
    /// name is evicted so the next lookup builds from the new factory.
    pub fn register(&self, name: &str, factory: impl Into<Arc<Factory>>) -> Result<(), ContainerError> {
        let name = FullName::parse(name)?;
        self.ensure_alive(&name)?;
        self.registry()?.register_name(name.clone(), factory.into());
        if self.state()?.cache.remove(&name).is_some() {
            log::debug!("Evicted cached instance of {} after override", name);
        }
        Ok(())
    }

    /// Resolve `name` to its factory without visibility rules
    pub fn factory_for(&self, name: &FullName) -> Result<Option<Arc<Factory>>, ContainerError> {
        Ok(self.registry()?.resolve(name))
    }

    /// Whether `name` may be looked up from this container
    pub fn is_visible(&self, name: &FullName) -> Result<bool, ContainerError> {
        match &self.inner.visibility {
            Visibility::Integration => Ok(true),
            Visibility::Isolated { needs } => Ok(name == &self.inner.subject_name
                || needs.contains(name)
                || self.registry()?.has_override(name)),
        }
    }

    /// Look up `name`. `Ok(None)` when it is hidden by the visibility rules
    /// or simply not registered.
    pub fn lookup(&self, name: &str) -> Result<Option<Instance>, ContainerError> {
        let name = FullName::parse(name)?;
        self.lookup_name(&name)
    }

    /// Look up an already parsed name
    pub fn lookup_name(&self, name: &FullName) -> Result<Option<Instance>, ContainerError> {
        let mut path = Vec::new();
        self.lookup_inner(name, &mut path)
    }

    fn lookup_inner(&self, name: &FullName, path: &mut Vec<FullName>) -> Result<Option<Instance>, ContainerError> {
        self.ensure_alive(name)?;
        if let Some(cached) = self.state()?.cache.get(name) {
            return Ok(Some(cached.clone()));
        }
        if !self.is_visible(name)? {
            log::debug!("{} is not visible from {}", name, self.inner.id);
            return Ok(None);
        }
        let Some(factory) = self.factory_for(name)? else {
            return Ok(None);
        };

        let instance = self.instantiate(name, &factory, Properties::new(), path)?;
        if factory.is_singleton() {
            let mut state = self.state()?;
            // A dependency cycle through a transient can re-enter here; keep the first.
            let cached = state.cache.entry(name.clone()).or_insert_with(|| instance.clone());
            return Ok(Some(cached.clone()));
        }
        Ok(Some(instance))
    }

    /// Create a fresh, uncached instance of `name` with `overrides` applied.
    /// Used for the subject, which the test context memoizes itself.
    pub fn create(&self, name: &FullName, overrides: Properties) -> Result<Instance, ContainerError> {
        self.ensure_alive(name)?;
        let factory = self.factory_for(name)?.ok_or_else(|| ContainerError::SubjectNotFound {
            name: name.to_string(),
        })?;
        let mut path = Vec::new();
        self.instantiate(name, &factory, overrides, &mut path)
    }

    fn instantiate(
        &self,
        name: &FullName,
        factory: &Factory,
        overrides: Properties,
        path: &mut Vec<FullName>,
    ) -> Result<Instance, ContainerError> {
        if path.contains(name) {
            let mut cycle: Vec<String> = path.iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(ContainerError::DependencyCycle { name: name.to_string(), path: cycle });
        }

        path.push(name.clone());
        let mut injected = HashMap::new();
        for injection in factory.injections() {
            let target = injection.target_name()?;
            match self.lookup_inner(&target, path)? {
                Some(dep) => {
                    injected.insert(injection.property().to_string(), dep);
                }
                None => {
                    return Err(ContainerError::MissingDependency {
                        name: name.to_string(),
                        property: injection.property().to_string(),
                        dependency: target.to_string(),
                    });
                }
            }
        }
        path.pop();

        let instance = factory
            .instantiate(name.clone(), overrides, injected)
            .map_err(|e| ContainerError::InstantiationFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let mut state = self.state()?;
        state.owned_ids.insert(instance.id());
        state.owned.push(instance.clone());
        log::debug!("{} created {} {}", self.inner.id, name, instance.id());
        Ok(instance)
    }

    fn ensure_alive(&self, name: &FullName) -> Result<(), ContainerError> {
        if self.state()?.destroyed {
            return Err(ContainerError::Destroyed {
                subject: self.inner.subject_name.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Whether this container produced `instance`
    pub fn owns(&self, instance: &Instance) -> bool {
        self.state()
            .map(|state| state.owned_ids.contains(&instance.id()))
            .unwrap_or(false)
    }

    /// Owner query: this container if it produced `instance`
    pub fn owner_of(&self, instance: &Instance) -> Option<Container> {
        self.owns(instance).then(|| self.clone())
    }

    /// Destroy every owned instance, newest first, and clear the cache and
    /// ownership index. Calling it again is a no-op. Returns how many
    /// instances were destroyed by this call.
    pub fn destroy(&self) -> Result<usize, ContainerError> {
        let owned = {
            let mut state = self.state()?;
            if state.destroyed {
                return Ok(0);
            }
            state.destroyed = true;
            state.cache.clear();
            state.owned_ids.clear();
            std::mem::take(&mut state.owned)
        };

        // Hooks run without the lock held; they may inspect other instances.
        let destroyed = owned.iter().rev().filter(|instance| instance.destroy()).count();
        log::debug!("{} destroyed {} instance(s)", self.inner.id, destroyed);
        Ok(destroyed)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state().map(|state| state.destroyed).unwrap_or(true)
    }

    /// Names currently in the singleton cache, sorted
    pub fn cached_names(&self) -> Vec<FullName> {
        let mut names: Vec<FullName> = self
            .state()
            .map(|state| state.cache.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of live instances this container owns
    pub fn owned_count(&self) -> usize {
        self.state().map(|state| state.owned.len()).unwrap_or(0)
    }

    /// Identity comparison
    pub fn same(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
