use std::fmt;
use std::time::Duration;

use crate::kernel::error::Result;
use crate::lifecycle::LifecycleState;

/// Result of one test
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Passed,
    /// Failed; `phase` is set when a callback or the body raised the error
    Failed { phase: Option<LifecycleState>, message: String },
    Skipped(String),
}

impl TestOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TestOutcome::Failed { .. })
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "ok"),
            TestOutcome::Failed { message, .. } => write!(f, "FAILED: {}", message),
            TestOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub module: String,
    pub test: String,
    pub outcome: TestOutcome,
    pub duration: Duration,
}

impl TestReport {
    pub fn from_result(module: &str, test: &str, result: Result<()>, duration: Duration) -> Self {
        let outcome = match result {
            Ok(()) => TestOutcome::Passed,
            Err(e) => TestOutcome::Failed { phase: e.failed_phase(), message: e.to_string() },
        };
        Self { module: module.to_string(), test: test.to_string(), outcome, duration }
    }

    pub fn skipped(module: &str, test: &str, reason: &str) -> Self {
        Self {
            module: module.to_string(),
            test: test.to_string(),
            outcome: TestOutcome::Skipped(reason.to_string()),
            duration: Duration::ZERO,
        }
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} ... {}", self.module, self.test, self.outcome)
    }
}

/// Results of a suite run, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub name: String,
    pub tests: Vec<TestReport>,
}

impl SuiteReport {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), tests: Vec::new() }
    }

    pub fn push(&mut self, report: TestReport) {
        self.tests.push(report);
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, TestOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(TestOutcome::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TestOutcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&TestOutcome) -> bool) -> usize {
        self.tests.iter().filter(|t| pred(&t.outcome)).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Find a test by name
    pub fn get(&self, test: &str) -> Option<&TestReport> {
        self.tests.iter().find(|t| t.test == test)
    }

    pub fn summary(&self) -> String {
        format!(
            "Suite '{}': {} passed, {} failed, {} skipped",
            self.name,
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}
