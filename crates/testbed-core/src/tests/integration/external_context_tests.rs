#![cfg(test)]

use crate::context::{ScopeId, TestContext};
use crate::lifecycle::{hook, LifecycleCallbacks, LifecycleState, TestModule};
use crate::tests::integration::common::Recorder;

#[tokio::test]
async fn test_provided_context_is_the_receiver_everywhere() {
    let seen: Recorder<ScopeId> = Recorder::new();
    let (a, b) = (seen.clone(), seen.clone());
    let callbacks = LifecycleCallbacks::new()
        .setup(hook(move |ctx: &mut TestContext| {
            a.push(ctx.scope_id());
            Ok(())
        }))
        .teardown(hook(move |ctx: &mut TestContext| {
            b.push(ctx.scope_id());
            Ok(())
        }));
    let mut module = TestModule::new("component:x-foo", "Foo", callbacks).unwrap();

    let host = TestContext::detached();
    let host_scope = host.scope_id();
    module.set_context(host).unwrap();
    module.setup().await.unwrap();

    let body_seen = seen.clone();
    let body = hook(move |ctx: &mut TestContext| {
        body_seen.push(ctx.scope_id());
        Ok(())
    });
    module.run_body(body.as_ref()).await.unwrap();

    module.teardown().await.unwrap();
    let returned = module.take_external_context().expect("external context is handed back");
    assert_eq!(returned.scope_id(), host_scope);
    assert!(!returned.is_bound());

    let scopes = seen.entries();
    assert_eq!(scopes.len(), 3);
    assert!(scopes.iter().all(|scope| *scope == host_scope));
}

#[tokio::test]
async fn test_module_owned_context_is_not_returned() {
    let mut module = TestModule::new("component:x-foo", "", LifecycleCallbacks::new()).unwrap();
    module.setup().await.unwrap();
    module.teardown().await.unwrap();
    assert!(module.take_external_context().is_none());
}

#[tokio::test]
async fn test_context_cannot_be_swapped_mid_test() {
    let mut module = TestModule::new("component:x-foo", "", LifecycleCallbacks::new()).unwrap();
    module.setup().await.unwrap();
    assert!(module.set_context(TestContext::detached()).is_err());
    module.teardown().await.unwrap();
    assert!(module.set_context(TestContext::detached()).is_ok());
}

#[tokio::test]
async fn test_provided_context_survives_a_failing_teardown() {
    let callbacks = LifecycleCallbacks::new()
        .teardown(hook(|_: &mut TestContext| Err("boom".into())));
    let mut module = TestModule::new("component:x-foo", "", callbacks).unwrap();

    let host = TestContext::detached();
    let host_scope = host.scope_id();
    module.set_context(host).unwrap();
    module.setup().await.unwrap();

    let err = module.teardown().await.unwrap_err();
    assert_eq!(err.failed_phase(), Some(LifecycleState::Teardown));
    assert!(module.context().is_none());

    let returned = module.take_external_context().expect("context kept despite the failure");
    assert_eq!(returned.scope_id(), host_scope);
    assert!(!returned.is_bound());
    assert!(module.take_external_context().is_none());
}

#[tokio::test]
async fn test_provided_context_survives_a_failing_test() {
    let callbacks = LifecycleCallbacks::new()
        .after_teardown(hook(|_: &mut TestModule| Err("after teardown broke".into())));
    let mut module = TestModule::new("component:x-foo", "", callbacks).unwrap();

    let host = TestContext::detached();
    let host_scope = host.scope_id();
    module.set_context(host).unwrap();

    let body = hook(|_: &mut TestContext| Err("body broke".into()));
    let err = module.run_test("fails", body.as_ref()).await.unwrap_err();
    assert_eq!(err.failed_phase(), Some(LifecycleState::TestRunning));

    let returned = module.take_external_context().expect("context kept after run_test");
    assert_eq!(returned.scope_id(), host_scope);
}
