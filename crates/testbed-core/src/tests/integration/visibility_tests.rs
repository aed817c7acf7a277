#![cfg(test)]

use crate::context::TestContext;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::{hook, Integration, LifecycleCallbacks, TestModule};
use crate::object::Factory;
use crate::tests::integration::common::seed_registry;

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition { Ok(()) } else { Err(Error::Other(message.to_string())) }
}

async fn run(module: &mut TestModule, body: fn(&mut TestContext) -> Result<()>) {
    module.run_test("scenario", hook(body).as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_isolated_module_knows_nothing_about_other_components() {
    let callbacks = LifecycleCallbacks::new().before_setup(seed_registry());
    let mut module = TestModule::new("component:x-foo", "without needs", callbacks).unwrap();
    assert!(!module.is_integration());

    run(&mut module, |ctx| {
        let other = ctx.container()?.lookup("component:not-the-subject")?;
        ensure(other.is_none(), "non-subject component should be hidden")
    })
    .await;
}

#[tokio::test]
async fn test_needs_gets_us_the_component_we_need() {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .needs(["component:not-the-subject"]);
    let mut module = TestModule::new("component:x-foo", "needing another component", callbacks).unwrap();

    run(&mut module, |ctx| {
        let other = ctx.lookup("component:not-the-subject")?;
        ensure(other.is_some(), "needed component resolves")
    })
    .await;
}

#[tokio::test]
async fn test_integration_needs_no_needs() {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(hook(|module: &mut TestModule| {
            assert!(module.is_integration());
            crate::tests::integration::common::setup_registry(module)
        }))
        .integration(Integration::Enabled);
    let mut module = TestModule::new("component:x-foo", "integration", callbacks).unwrap();

    run(&mut module, |ctx| {
        ensure(ctx.lookup("component:not-the-subject")?.is_some(), "integration sees everything")
    })
    .await;
}

#[test]
fn test_integration_and_needs_together_are_rejected() {
    let callbacks = LifecycleCallbacks::new()
        .integration(Integration::Enabled)
        .needs(["component:x-bar"]);
    let err = TestModule::new("component:x-foo", "", callbacks).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_legacy_integration_outside_component_integration_is_rejected() {
    let callbacks = LifecycleCallbacks::new().integration(Integration::Legacy);
    assert!(TestModule::new("component:x-foo", "", callbacks.clone()).unwrap_err().is_configuration());

    let module = TestModule::for_component_integration("component:x-foo", "", callbacks).unwrap();
    assert!(!module.is_integration());
}

#[tokio::test]
async fn test_legacy_component_integration_stays_isolated() {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .integration(Integration::Legacy);
    let mut module = TestModule::for_component_integration("component:x-foo", "legacy", callbacks).unwrap();
    run(&mut module, |ctx| {
        ensure(ctx.lookup("component:not-the-subject")?.is_none(), "unlisted names stay hidden")?;
        ensure(ctx.lookup("component:x-foo")?.is_some(), "the subject resolves")
    })
    .await;

    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .integration(Integration::Legacy)
        .needs(["component:not-the-subject"]);
    let mut module = TestModule::for_component_integration("component:x-foo", "legacy with needs", callbacks).unwrap();
    run(&mut module, |ctx| {
        ensure(ctx.lookup("component:not-the-subject")?.is_some(), "needed names resolve")
    })
    .await;
}

fn integration_module() -> TestModule {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .integration(Integration::Enabled);
    TestModule::new("component:x-foo", "override factories in integration mode", callbacks).unwrap()
}

#[tokio::test]
async fn test_gets_the_default_by_default() {
    let mut module = integration_module();
    run(&mut module, |ctx| {
        let thing = ctx.lookup("foo:thing")?.ok_or("foo:thing should resolve")?;
        ensure(thing.is_truthy("fromDefaultRegistry"), "found from the default registry")
    })
    .await;
}

#[tokio::test]
async fn test_can_override_the_default() {
    let mut module = integration_module();
    run(&mut module, |ctx| {
        ctx.register("foo:thing", Factory::object().with("notTheDefault", true))?;
        let thing = ctx.lookup("foo:thing")?.ok_or("foo:thing should resolve")?;
        ensure(!thing.is_truthy("fromDefaultRegistry"), "not from the default registry")?;
        ensure(thing.is_truthy("notTheDefault"), "found from the overridden factory")
    })
    .await;

    // The next test sees the default again
    run(&mut module, |ctx| {
        let thing = ctx.lookup("foo:thing")?.ok_or("foo:thing should resolve")?;
        ensure(thing.is_truthy("fromDefaultRegistry"), "override did not leak")
    })
    .await;
}

#[tokio::test]
async fn test_full_name_normalization_by_default() {
    let mut module = integration_module();
    run(&mut module, |ctx| {
        ctx.register("foo:needs-service", Factory::object().inject_service("otherThing"))?;
        let foo = ctx.lookup("foo:needs-service")?.ok_or("foo:needs-service should resolve")?;
        let thing = foo.injected("otherThing").ok_or("otherThing should be injected")?;
        ensure(thing.is_truthy("fromDefaultRegistry"), "found from the default registry")
    })
    .await;
}

#[tokio::test]
async fn test_override_with_full_name_normalization() {
    let mut module = integration_module();
    run(&mut module, |ctx| {
        ctx.register("service:other-thing", Factory::object().with("notTheDefault", true))?;
        ctx.register("foo:needs-service", Factory::object().inject_service("otherThing"))?;
        let foo = ctx.lookup("foo:needs-service")?.ok_or("foo:needs-service should resolve")?;
        let thing = foo.injected("otherThing").ok_or("otherThing should be injected")?;
        ensure(!thing.is_truthy("fromDefaultRegistry"), "not from the default registry")?;
        ensure(thing.is_truthy("notTheDefault"), "found from the overridden factory")
    })
    .await;
}
