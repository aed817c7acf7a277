use std::fmt;
use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::container::{Container, Visibility};
use crate::context::{ContextBinding, ScopeId, TestContext};
use crate::event::{create_dispatcher, LifecyclePhaseEvent, SharedEventDispatcher};
use crate::fixture::FixtureSurface;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::callbacks::LifecycleCallbacks;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::hook::Hook;
use crate::lifecycle::state::LifecycleState;
use crate::lifecycle::validator::{validate, ModuleKind};
use crate::object::{Factory, Instance};
use crate::registry::name::FullName;
use crate::registry::resolver::MapResolver;
use crate::registry::store::Registry;

/// State kept on the module across a test boundary
#[derive(Debug, Clone, Default)]
pub struct ModuleCache {
    subject: Option<Instance>,
}

impl ModuleCache {
    /// The subject created by the last test, if it created one
    pub fn subject(&self) -> Option<&Instance> {
        self.subject.as_ref()
    }
}

/// Drives one module's tests through
/// `before_setup → setup → body → teardown → after_teardown`.
///
/// Every test gets a fresh [`Registry`], [`Container`] and [`TestContext`].
/// `before_setup` and `after_teardown` receive the module itself, which is
/// also where the default registry is seeded.
pub struct TestModule {
    scope_id: ScopeId,
    kind: ModuleKind,
    subject_name: FullName,
    description: String,
    needs: Vec<FullName>,
    is_integration: bool,
    callbacks: Arc<LifecycleCallbacks>,
    defaults: MapResolver,
    config: HarnessConfig,
    events: SharedEventDispatcher,
    fixture: Option<Arc<dyn FixtureSurface>>,
    fixture_snapshot: Option<String>,
    state: LifecycleState,
    context: Option<TestContext>,
    external_context: bool,
    released_context: Option<TestContext>,
    cache: ModuleCache,
    current_test: Option<String>,
}

impl fmt::Debug for TestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModule")
         .field("scope_id", &self.scope_id)
         .field("kind", &self.kind)
         .field("subject_name", &self.subject_name)
         .field("description", &self.description)
         .field("needs", &self.needs)
         .field("is_integration", &self.is_integration)
         .field("state", &self.state)
         .field("defaults", &self.defaults.len())
         .field("has_context", &self.context.is_some())
         .field("has_released_context", &self.released_context.is_some())
         .field("current_test", &self.current_test)
         .finish()
    }
}

impl TestModule {
    /// Define a module for `subject_name`. Fails with a configuration error if
    /// the callbacks combine options illegally.
    pub fn new(subject_name: &str, description: &str, callbacks: LifecycleCallbacks) -> Result<Self> {
        Self::define(ModuleKind::Unit, subject_name, description, callbacks)
    }

    /// Define a component integration module; the only kind that accepts
    /// `Integration::Legacy`
    pub fn for_component_integration(
        subject_name: &str,
        description: &str,
        callbacks: LifecycleCallbacks,
    ) -> Result<Self> {
        Self::define(ModuleKind::ComponentIntegration, subject_name, description, callbacks)
    }

    fn define(
        kind: ModuleKind,
        subject_name: &str,
        description: &str,
        callbacks: LifecycleCallbacks,
    ) -> Result<Self> {
        let validated = validate(kind, subject_name, &callbacks)?;
        let description = if description.is_empty() {
            validated.subject_name.to_string()
        } else {
            description.to_string()
        };
        log::info!(
            "Defined test module '{}' for {} (integration: {}, needs: {})",
            description,
            validated.subject_name,
            validated.is_integration,
            validated.needs.len()
        );
        Ok(Self {
            scope_id: ScopeId::next(),
            kind,
            subject_name: validated.subject_name,
            description,
            needs: validated.needs,
            is_integration: validated.is_integration,
            callbacks: Arc::new(callbacks),
            defaults: MapResolver::new(),
            config: HarnessConfig::default(),
            events: create_dispatcher(),
            fixture: None,
            fixture_snapshot: None,
            state: LifecycleState::Idle,
            context: None,
            external_context: false,
            released_context: None,
            cache: ModuleCache::default(),
            current_test: None,
        })
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish deprecations and phase events through `events`
    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_fixture(mut self, fixture: Arc<dyn FixtureSurface>) -> Self {
        self.fixture = Some(fixture);
        self
    }

    /// Start from an existing set of default entries
    pub fn with_defaults(mut self, defaults: MapResolver) -> Self {
        self.defaults = defaults;
        self
    }

    //--------------------------------------------------
    // Accessors
    //--------------------------------------------------

    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn subject_name(&self) -> &FullName {
        &self.subject_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn needs(&self) -> &[FullName] {
        &self.needs
    }

    pub fn is_integration(&self) -> bool {
        self.is_integration
    }

    pub fn callbacks(&self) -> &LifecycleCallbacks {
        &self.callbacks
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn events(&self) -> &SharedEventDispatcher {
        &self.events
    }

    pub fn fixture(&self) -> Option<&Arc<dyn FixtureSurface>> {
        self.fixture.as_ref()
    }

    /// The default registry entries
    pub fn defaults(&self) -> &MapResolver {
        &self.defaults
    }

    /// The live test context; `None` outside `setup..teardown`
    pub fn context(&self) -> Option<&TestContext> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut TestContext> {
        self.context.as_mut()
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Name of the test being run through [`run_test`](Self::run_test)
    pub fn current_test(&self) -> Option<&str> {
        self.current_test.as_deref()
    }

    //--------------------------------------------------
    // Default registry
    //--------------------------------------------------

    /// Add or replace a default entry. Tests set up afterwards see it.
    pub fn seed(&mut self, name: &str, factory: impl Into<Arc<Factory>>) -> Result<()> {
        if self.defaults.insert(name, factory)?.is_some() {
            log::debug!("Replaced default entry {} for module '{}'", name, self.description);
        }
        Ok(())
    }

    pub fn seed_all<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, Factory)>,
        S: AsRef<str>,
    {
        for (name, factory) in entries {
            self.seed(name.as_ref(), factory)?;
        }
        Ok(())
    }

    //--------------------------------------------------
    // Lifecycle
    //--------------------------------------------------

    /// Supply the context the next test runs against. Allowed only between
    /// tests; after teardown it is available from
    /// [`take_external_context`](Self::take_external_context).
    pub fn set_context(&mut self, context: TestContext) -> Result<()> {
        if self.state != LifecycleState::Idle {
            return Err(LifecycleError::ContextInUse { state: self.state }.into());
        }
        if let Some(stale) = self.released_context.take() {
            log::debug!("Discarding unclaimed external context {}", stale.scope_id());
        }
        log::debug!("Module '{}' adopting external context {}", self.description, context.scope_id());
        self.context = Some(context);
        self.external_context = true;
        Ok(())
    }

    fn advance(&mut self, to: LifecycleState) -> Result<()> {
        if !self.state.can_advance_to(to) {
            return Err(LifecycleError::InvalidTransition { from: self.state, to }.into());
        }
        self.state = to;
        if self.config.trace_lifecycle {
            log::debug!("Module '{}' entered {}", self.description, to);
            let event = LifecyclePhaseEvent {
                subject_name: self.subject_name.to_string(),
                description: self.description.clone(),
                test_name: self.current_test.clone(),
                phase: to,
                module_scope: self.scope_id,
            };
            if let Err(e) = self.events.dispatch(&event) {
                log::warn!("Failed to publish phase event for '{}': {}", self.description, e);
            }
        }
        Ok(())
    }

    /// Run `before_setup`, build the test's registry, container and context,
    /// then run `setup`.
    ///
    /// Once started, the module always ends up in
    /// [`TestRunning`](LifecycleState::TestRunning) so that
    /// [`teardown`](Self::teardown) can run. If `before_setup` fails no
    /// context is built.
    pub async fn setup(&mut self) -> Result<()> {
        self.advance(LifecycleState::BeforeSetup)?;
        self.cache.subject = None;

        let mut failure = None;
        if let Some(hook) = self.callbacks.before_setup_hook().cloned() {
            if let Err(e) = hook.call(self).await {
                failure = Some(LifecycleError::callback_failed(LifecycleState::BeforeSetup, e));
            }
        }

        self.advance(LifecycleState::Setup)?;
        if failure.is_none() {
            self.build_context();
            self.capture_fixture();
            if let (Some(hook), Some(context)) = (self.callbacks.setup_hook().cloned(), self.context.as_mut()) {
                if let Err(e) = hook.call(context).await {
                    failure = Some(LifecycleError::callback_failed(LifecycleState::Setup, e));
                }
            }
        }

        self.advance(LifecycleState::TestRunning)?;
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn build_context(&mut self) {
        let registry = Registry::new(Arc::new(self.defaults.clone()), self.callbacks.custom_resolver());
        let visibility = if self.is_integration {
            Visibility::Integration
        } else {
            Visibility::isolated(self.needs.iter().cloned())
        };
        let container = Container::new(self.subject_name.clone(), registry, visibility);
        log::debug!("Built {} for module '{}'", container.id(), self.description);

        let binding = ContextBinding {
            subject_name: self.subject_name.clone(),
            description: self.description.clone(),
            is_integration: self.is_integration,
            container,
            callbacks: self.callbacks.clone(),
            events: self.events.clone(),
            deprecations: self.config.deprecations,
        };
        let mut context = self.context.take().unwrap_or_else(TestContext::detached);
        context.bind(binding);
        self.context = Some(context);
    }

    fn capture_fixture(&mut self) {
        if !self.config.reset_fixture {
            return;
        }
        self.fixture_snapshot = self.fixture.as_ref().map(|fixture| fixture.snapshot());
    }

    fn reset_fixture(&mut self) {
        if let (Some(fixture), Some(snapshot)) = (&self.fixture, self.fixture_snapshot.take()) {
            if fixture.restore(&snapshot) {
                log::debug!("Restored fixture '{}' for module '{}'", fixture.name(), self.description);
            }
        }
    }

    /// Run a test body against the live context
    pub async fn run_body(&mut self, body: &dyn Hook<TestContext>) -> Result<()> {
        if self.state != LifecycleState::TestRunning {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: LifecycleState::TestRunning,
            }
            .into());
        }
        let context = self.context.as_mut().ok_or_else(|| LifecycleError::ContextUnbound {
            operation: "run the test body".to_string(),
        })?;
        body.call(context)
            .await
            .map_err(|e| LifecycleError::callback_failed(LifecycleState::TestRunning, e).into())
    }

    /// Take back the context supplied through [`set_context`](Self::set_context)
    /// once teardown has released it. Available whether or not the test
    /// failed.
    pub fn take_external_context(&mut self) -> Option<TestContext> {
        self.released_context.take()
    }

    /// Run `teardown`, reset the fixture, destroy the container, drop the
    /// context and run `after_teardown`.
    ///
    /// Every step runs even if an earlier one failed; the first failure is
    /// returned after `after_teardown`. A context supplied through
    /// [`set_context`](Self::set_context) is cleared and kept for
    /// [`take_external_context`](Self::take_external_context).
    pub async fn teardown(&mut self) -> Result<()> {
        self.advance(LifecycleState::Teardown)?;
        let mut failure: Option<Error> = None;

        if let (Some(hook), Some(context)) = (self.callbacks.teardown_hook().cloned(), self.context.as_mut()) {
            if let Err(e) = hook.call(context).await {
                record(&mut failure, LifecycleError::callback_failed(LifecycleState::Teardown, e).into());
            }
        }

        self.reset_fixture();

        if let Some(mut context) = self.context.take() {
            if let Ok(container) = context.container() {
                match container.destroy() {
                    Ok(count) => log::debug!("Destroyed {} with {} instance(s)", container.id(), count),
                    Err(e) => record(&mut failure, e.into()),
                }
            }
            self.cache.subject = context.release();
            if self.external_context {
                self.released_context = Some(context);
            }
        }
        self.external_context = false;

        self.advance(LifecycleState::AfterTeardown)?;
        if let Some(hook) = self.callbacks.after_teardown_hook().cloned() {
            if let Err(e) = hook.call(self).await {
                record(&mut failure, LifecycleError::callback_failed(LifecycleState::AfterTeardown, e).into());
            }
        }

        self.advance(LifecycleState::Idle)?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run one complete test: setup, `body`, teardown.
    ///
    /// The body is skipped if setup failed. Teardown always runs once setup
    /// has started, and the first failure is returned after it.
    pub async fn run_test(&mut self, name: &str, body: &dyn Hook<TestContext>) -> Result<()> {
        if self.state != LifecycleState::Idle {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: LifecycleState::BeforeSetup,
            }
            .into());
        }
        self.current_test = Some(name.to_string());
        log::info!("Running test '{}' in module '{}'", name, self.description);

        let mut failure = self.setup().await.err();
        if failure.is_none() {
            failure = self.run_body(body).await.err();
        }
        if let Err(e) = self.teardown().await {
            record(&mut failure, e);
        }
        self.current_test = None;

        match failure {
            Some(e) => {
                log::info!("Test '{}' in module '{}' failed: {}", name, self.description, e);
                Err(e)
            }
            None => {
                log::info!("Test '{}' in module '{}' passed", name, self.description);
                Ok(())
            }
        }
    }
}

/// Keep the first failure, log the rest
fn record(failure: &mut Option<Error>, error: Error) {
    match failure {
        Some(first) => log::warn!("Additional failure during cleanup: {} (first: {})", error, first),
        None => *failure = Some(error),
    }
}
