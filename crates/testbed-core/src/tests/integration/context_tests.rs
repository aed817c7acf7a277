#![cfg(test)]

use serde_json::{json, Value};

use crate::config::{DeprecationPolicy, HarnessConfig};
use crate::context::TestContext;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::{hook, LifecycleCallbacks, TestModule};
use crate::object::Factory;
use crate::tests::integration::common::{capture_deprecations, seed_registry, Recorder};

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition { Ok(()) } else { Err(Error::Other(message.to_string())) }
}

fn setup_context_module() -> TestModule {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .setup(hook(|ctx: &mut TestContext| {
            ctx.subject_with(json!({ "name": "Max" }))?;
            ctx.register("service:blah", Factory::object().with("purpose", "blabering"))
        }));
    TestModule::new("component:x-foo", "component:x-foo -- setup context", callbacks).unwrap()
}

#[tokio::test]
async fn test_subject_can_be_initialized_in_setup() {
    let mut module = setup_context_module();
    let body = hook(|ctx: &mut TestContext| {
        let name = ctx.subject()?.get_str("name");
        ensure(name.as_deref() == Some("Max"), "subject keeps the setup overrides")
    });
    module.run_test("subject can be initialized in setup", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_can_lookup_factory_registered_in_setup() {
    let mut module = setup_context_module();
    let body = hook(|ctx: &mut TestContext| {
        ctx.inject().service("blah")?;
        ensure(ctx.get_path("blah.purpose") == Some(json!("blabering")), "injected service is readable")
    });
    module.run_test("can lookup factory registered in setup", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_context_display_names_the_subject() {
    let mut module = setup_context_module();
    let body = hook(|ctx: &mut TestContext| {
        ensure(ctx.to_string() == "test context for: component:x-foo", "display names the subject")
    });
    module.run_test("display", body.as_ref()).await.unwrap();
}

fn callback_context_module(config: HarnessConfig) -> TestModule {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .with_helper("getSubjectName", |ctx| Ok(ctx.get("subjectName").unwrap_or(Value::Null)))
        .with_helper("getFoo", |ctx| Ok(ctx.get("foo").unwrap_or(Value::Null)));
    TestModule::new("component:x-foo", "component:x-foo -- callback context", callbacks)
        .unwrap()
        .with_config(config)
}

#[tokio::test]
async fn test_module_property_from_helper_raises_deprecation() {
    let mut module = callback_context_module(HarnessConfig::default());
    let deprecations = capture_deprecations(module.events());

    let body = hook(|ctx: &mut TestContext| {
        ensure(ctx.call_helper("getSubjectName")? == json!("component:x-foo"), "helper reads the subject name")
    });
    module.run_test("deprecated access", body.as_ref()).await.unwrap();

    assert!(deprecations.entries().contains(
        &"Accessing the test module property \"subjectName\" from a callback is deprecated.".to_string()
    ));
}

#[tokio::test]
async fn test_context_property_from_helper_is_silent() {
    let config = HarnessConfig { deprecations: DeprecationPolicy::Silent, ..HarnessConfig::default() };
    let mut module = callback_context_module(config);
    let deprecations = capture_deprecations(module.events());

    let body = hook(|ctx: &mut TestContext| {
        ctx.set("foo", "bar");
        ensure(ctx.call_helper("getFoo")? == json!("bar"), "helper reads the context property")
    });
    module.run_test("own property", body.as_ref()).await.unwrap();

    assert_eq!(deprecations.len(), 0);
}

#[tokio::test]
async fn test_created_subjects_are_destroyed() {
    let destroyed = Recorder::new();
    let sink = destroyed.clone();
    let callbacks = LifecycleCallbacks::new()
        .before_setup(hook(move |module: &mut TestModule| {
            let sink = sink.clone();
            module.seed(
                "component:x-foo",
                Factory::object().on_destroy(move |i| sink.push(i.id())),
            )
        }))
        .after_teardown(hook(|module: &mut TestModule| {
            let subject = module.cache().subject().ok_or("the subject should be cached")?;
            ensure(subject.is_destroyed(), "subject destroyed before afterTeardown")
        }));
    let mut module = TestModule::new("component:x-foo", "cleanup", callbacks).unwrap();

    let body = hook(|ctx: &mut TestContext| {
        let first = ctx.subject()?;
        let second = ctx.subject()?;
        ensure(first.same(&second), "subject is memoized")
    });
    module.run_test("subjects created in a test are destroyed", body.as_ref()).await.unwrap();

    let subject = module.cache().subject().unwrap();
    assert_eq!(destroyed.entries(), vec![subject.id()]);
}

#[tokio::test]
async fn test_uncreated_subjects_do_not_error() {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .after_teardown(hook(|module: &mut TestModule| {
            ensure(module.cache().subject().is_none(), "no subject was created")
        }));
    let mut module = TestModule::new("component:x-foo", "uncreated", callbacks).unwrap();
    module.run_test("no subject", hook(|_: &mut TestContext| Ok(())).as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_missing_subject_factory_fails_the_test() {
    let mut module = TestModule::new("component:missing", "", LifecycleCallbacks::new()).unwrap();
    let body = hook(|ctx: &mut TestContext| ctx.subject().map(|_| ()));
    let err = module.run_test("no factory", body.as_ref()).await.unwrap_err();
    assert!(err.to_string().contains("component:missing"), "got: {}", err);
}
