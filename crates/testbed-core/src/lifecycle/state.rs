use std::fmt;

/// Phase of a test module's lifecycle.
///
/// A module advances strictly in order and wraps back to `Idle` after
/// `AfterTeardown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// No test in progress
    #[default]
    Idle,
    /// Running `before_setup` against the module
    BeforeSetup,
    /// Building the container and context, running `setup`
    Setup,
    /// Set up; the test body may run
    TestRunning,
    /// Running `teardown`, resetting the fixture, destroying the container
    Teardown,
    /// Running `after_teardown` against the module
    AfterTeardown,
}

impl LifecycleState {
    /// The only state this one may advance to
    pub fn next(self) -> Self {
        match self {
            LifecycleState::Idle => LifecycleState::BeforeSetup,
            LifecycleState::BeforeSetup => LifecycleState::Setup,
            LifecycleState::Setup => LifecycleState::TestRunning,
            LifecycleState::TestRunning => LifecycleState::Teardown,
            LifecycleState::Teardown => LifecycleState::AfterTeardown,
            LifecycleState::AfterTeardown => LifecycleState::Idle,
        }
    }

    pub fn can_advance_to(self, to: LifecycleState) -> bool {
        self.next() == to
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::BeforeSetup => "before_setup",
            LifecycleState::Setup => "setup",
            LifecycleState::TestRunning => "test",
            LifecycleState::Teardown => "teardown",
            LifecycleState::AfterTeardown => "after_teardown",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
