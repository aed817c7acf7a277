//! # Testbed Core Suite
//!
//! Collects modules and their named test bodies and runs them strictly one
//! after another, producing a [`SuiteReport`].
pub mod report;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::HarnessConfig;
use crate::event::{create_dispatcher, SharedEventDispatcher};
use crate::fixture::FixtureSurface;
use crate::kernel::error::Result;
use crate::lifecycle::{ContextHook, LifecycleCallbacks, TestModule};

pub use report::{SuiteReport, TestOutcome, TestReport};

struct SuiteEntry {
    module: TestModule,
    tests: Vec<(String, ContextHook)>,
}

/// An ordered list of modules and their tests
pub struct Suite {
    name: String,
    config: HarnessConfig,
    events: SharedEventDispatcher,
    fixture: Option<Arc<dyn FixtureSurface>>,
    entries: Vec<SuiteEntry>,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
         .field("name", &self.name)
         .field("config", &self.config)
         .field("modules", &self.module_count())
         .field("tests", &self.test_count())
         .finish()
    }
}

impl Suite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: HarnessConfig::default(),
            events: create_dispatcher(),
            fixture: None,
            entries: Vec::new(),
        }
    }

    /// Settings applied to modules defined through this suite
    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = events;
        self
    }

    /// Fixture surface shared by every module defined through this suite
    pub fn with_fixture(mut self, fixture: Arc<dyn FixtureSurface>) -> Self {
        self.fixture = Some(fixture);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn events(&self) -> &SharedEventDispatcher {
        &self.events
    }

    pub fn module_count(&self) -> usize {
        self.entries.len()
    }

    pub fn test_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.tests.len()).sum()
    }

    /// Define a module and start adding tests to it.
    ///
    /// Configuration errors surface here and nothing is added.
    pub fn define_module(
        &mut self,
        subject_name: &str,
        description: &str,
        callbacks: LifecycleCallbacks,
    ) -> Result<ModuleHandle<'_>> {
        let module = TestModule::new(subject_name, description, callbacks)?;
        Ok(self.adopt(module))
    }

    pub fn define_component_integration(
        &mut self,
        subject_name: &str,
        description: &str,
        callbacks: LifecycleCallbacks,
    ) -> Result<ModuleHandle<'_>> {
        let module = TestModule::for_component_integration(subject_name, description, callbacks)?;
        Ok(self.adopt(module))
    }

    fn adopt(&mut self, module: TestModule) -> ModuleHandle<'_> {
        let mut module = module.with_config(self.config.clone()).with_events(self.events.clone());
        if let Some(fixture) = &self.fixture {
            module = module.with_fixture(fixture.clone());
        }
        self.add_module(module)
    }

    /// Add a module built elsewhere, keeping its own settings
    pub fn add_module(&mut self, module: TestModule) -> ModuleHandle<'_> {
        self.entries.push(SuiteEntry { module, tests: Vec::new() });
        let index = self.entries.len() - 1;
        ModuleHandle { suite: self, index }
    }

    /// Run every test in definition order. With `fail_fast`, tests after the
    /// first failure are reported as skipped.
    pub async fn run(&mut self) -> SuiteReport {
        log::info!("Running suite '{}' ({} tests)", self.name, self.test_count());
        let mut report = SuiteReport::new(&self.name);
        let mut stop = false;

        for entry in self.entries.iter_mut() {
            let module_name = entry.module.description().to_string();
            for (test_name, body) in &entry.tests {
                if stop {
                    report.push(TestReport::skipped(&module_name, test_name, "an earlier test failed"));
                    continue;
                }
                let started = Instant::now();
                let result = entry.module.run_test(test_name, body.as_ref()).await;
                let test_report = TestReport::from_result(&module_name, test_name, result, started.elapsed());
                if test_report.outcome.is_failure() && self.config.fail_fast {
                    log::warn!("Stopping suite '{}' after failure in '{}'", self.name, test_name);
                    stop = true;
                }
                report.push(test_report);
            }
        }

        log::info!("{}", report.summary());
        report
    }
}

/// Adds tests to a module just defined on a [`Suite`]
pub struct ModuleHandle<'a> {
    suite: &'a mut Suite,
    index: usize,
}

impl fmt::Debug for ModuleHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
         .field("suite", &self.suite.name)
         .field("module", &self.module().map(TestModule::description))
         .finish()
    }
}

impl ModuleHandle<'_> {
    /// Register a named test body
    pub fn test(self, name: &str, body: ContextHook) -> Self {
        if let Some(entry) = self.suite.entries.get_mut(self.index) {
            entry.tests.push((name.to_string(), body));
        }
        self
    }

    /// The module the tests will run in
    pub fn module(&self) -> Option<&TestModule> {
        self.suite.entries.get(self.index).map(|entry| &entry.module)
    }

    pub fn module_mut(&mut self) -> Option<&mut TestModule> {
        self.suite.entries.get_mut(self.index).map(|entry| &mut entry.module)
    }
}
