#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::event::{DeprecationEvent, EventResult, SharedEventDispatcher};
use crate::kernel::error::Result;
use crate::lifecycle::{hook, ModuleHook, TestModule};
use crate::object::Factory;

/// Seed the default entries most scenarios run against
pub fn setup_registry(module: &mut TestModule) -> Result<()> {
    module.seed_all([
        ("component:x-foo", Factory::object()),
        ("component:not-the-subject", Factory::object()),
        ("foo:thing", Factory::object().with("fromDefaultRegistry", true)),
        ("service:other-thing", Factory::object().with("fromDefaultRegistry", true)),
    ])
}

/// `before_setup` hook that only seeds the registry
pub fn seed_registry() -> ModuleHook {
    hook(|module: &mut TestModule| setup_registry(module))
}

/// Shared, append-only record of what happened
#[derive(Debug, Clone, Default)]
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn push(&self, entry: T) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Collect every deprecation message published on `events`
pub fn capture_deprecations(events: &SharedEventDispatcher) -> Recorder<String> {
    let recorder = Recorder::new();
    let sink = recorder.clone();
    events
        .register_type_handler::<DeprecationEvent, _>(move |event| {
            sink.push(event.message.clone());
            EventResult::Continue
        })
        .unwrap();
    recorder
}
