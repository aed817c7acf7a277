#![cfg(test)]

use crate::context::{ScopeId, TestContext};
use crate::kernel::error::Result;
use crate::lifecycle::{hook, LifecycleCallbacks, TestModule};
use crate::tests::integration::common::{setup_registry, Recorder};

type Seen = (&'static str, ScopeId);

fn phases(recorder: &Recorder<Seen>) -> Vec<&'static str> {
    recorder.entries().into_iter().map(|(name, _)| name).collect()
}

fn scope_of(recorder: &Recorder<Seen>, phase: &str) -> ScopeId {
    recorder
        .entries()
        .into_iter()
        .find_map(|(name, scope)| (name == phase).then_some(scope))
        .unwrap()
}

fn recording_module(recorder: &Recorder<Seen>) -> TestModule {
    let (a, b, c, d) = (recorder.clone(), recorder.clone(), recorder.clone(), recorder.clone());
    let callbacks = LifecycleCallbacks::new()
        .before_setup(hook(move |module: &mut TestModule| {
            a.push(("beforeSetup", module.scope_id()));
            setup_registry(module)
        }))
        .setup(hook(move |ctx: &mut TestContext| {
            b.push(("setup", ctx.scope_id()));
            Ok(())
        }))
        .teardown(hook(move |ctx: &mut TestContext| {
            c.push(("teardown", ctx.scope_id()));
            Ok(())
        }))
        .after_teardown(hook(move |module: &mut TestModule| -> Result<()> {
            assert!(module.context().is_none(), "the context must not outlive teardown");
            d.push(("afterTeardown", module.scope_id()));
            Ok(())
        }));
    TestModule::new("component:x-foo", "TestModule callbacks", callbacks).unwrap()
}

#[tokio::test]
async fn test_callbacks_run_in_order_around_the_body() {
    let recorder = Recorder::new();
    let mut module = recording_module(&recorder);

    module.setup().await.unwrap();
    assert_eq!(phases(&recorder), vec!["beforeSetup", "setup"]);

    let body_recorder = recorder.clone();
    let body = hook(move |ctx: &mut TestContext| {
        body_recorder.push(("body", ctx.scope_id()));
        Ok(())
    });
    module.run_body(body.as_ref()).await.unwrap();
    module.teardown().await.unwrap();

    assert_eq!(phases(&recorder), vec!["beforeSetup", "setup", "body", "teardown", "afterTeardown"]);
}

#[tokio::test]
async fn test_receivers_are_shared_per_side() {
    let recorder = Recorder::new();
    let mut module = recording_module(&recorder);
    module.run_test("receivers", hook(|_: &mut TestContext| Ok(())).as_ref()).await.unwrap();

    let before = scope_of(&recorder, "beforeSetup");
    let setup = scope_of(&recorder, "setup");
    let teardown = scope_of(&recorder, "teardown");
    let after = scope_of(&recorder, "afterTeardown");

    assert_eq!(setup, teardown);
    assert_eq!(before, after);
    assert_ne!(setup, before);
    assert_eq!(before, module.scope_id());
}

#[tokio::test]
async fn test_order_holds_when_the_body_fails() {
    let recorder = Recorder::new();
    let mut module = recording_module(&recorder);
    let result = module
        .run_test("fails", hook(|_: &mut TestContext| Err("assertion failed".into())).as_ref())
        .await;

    assert!(result.unwrap_err().is_callback_failure());
    assert_eq!(phases(&recorder), vec!["beforeSetup", "setup", "teardown", "afterTeardown"]);
}

#[tokio::test]
async fn test_each_test_gets_a_fresh_context() {
    let recorder = Recorder::new();
    let mut module = recording_module(&recorder);
    let pass = hook(|_: &mut TestContext| Ok(()));
    module.run_test("first", pass.as_ref()).await.unwrap();
    module.run_test("second", pass.as_ref()).await.unwrap();

    let setups: Vec<ScopeId> = recorder
        .entries()
        .into_iter()
        .filter_map(|(name, scope)| (name == "setup").then_some(scope))
        .collect();
    assert_eq!(setups.len(), 2);
    assert_ne!(setups[0], setups[1]);
}
