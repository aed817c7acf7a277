use std::sync::Arc;

use serde_json::json;
use testbed_core::fixture::{FixtureSurface, InMemoryFixture};
use testbed_core::kernel::error::{Error, Result};
use testbed_core::lifecycle::{hook, Integration, LifecycleCallbacks, TestModule};
use testbed_core::{Factory, HarnessConfig, MapResolver, Suite, TestContext};

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition { Ok(()) } else { Err(Error::Other(message.to_string())) }
}

fn seed_defaults(module: &mut TestModule) -> Result<()> {
    module.seed_all([
        ("component:x-foo", Factory::object().with("name", "x-foo")),
        ("component:not-the-subject", Factory::object()),
        ("foo:thing", Factory::object().with("fromDefaultRegistry", true)),
        ("service:other-thing", Factory::object().with("fromDefaultRegistry", true)),
    ])
}

fn seeded() -> LifecycleCallbacks {
    LifecycleCallbacks::new().before_setup(hook(seed_defaults))
}

/// Build the demonstration suite
pub fn build_suite(config: HarnessConfig) -> Result<Suite> {
    let fixture = InMemoryFixture::new("testbed-fixture");
    let mut suite = Suite::new("testbed demo")
        .with_config(config)
        .with_fixture(Arc::new(fixture.clone()));

    suite
        .define_module(
            "component:x-foo",
            "lifecycle",
            seeded().setup(hook(|ctx: &mut TestContext| {
                ctx.subject_with(json!({ "name": "Max" }))?;
                ctx.register("service:blah", Factory::object().with("purpose", "blabering"))
            })),
        )?
        .test("subject keeps setup overrides", hook(|ctx: &mut TestContext| {
            ensure(ctx.subject()?.get_str("name").as_deref() == Some("Max"), "subject name is Max")
        }))
        .test("services registered in setup can be injected", hook(|ctx: &mut TestContext| {
            ctx.inject().service("blah")?;
            ensure(ctx.get_path("blah.purpose") == Some(json!("blabering")), "blah.purpose")
        }))
        .test("context names its subject", hook(|ctx: &mut TestContext| {
            ensure(ctx.to_string() == "test context for: component:x-foo", "display")
        }));

    suite
        .define_module("component:x-foo", "isolation", seeded().needs(["foo:thing"]))?
        .test("unlisted names are hidden", hook(|ctx: &mut TestContext| {
            ensure(ctx.lookup("component:not-the-subject")?.is_none(), "not-the-subject is hidden")
        }))
        .test("needed names resolve", hook(|ctx: &mut TestContext| {
            ensure(ctx.lookup("foo:thing")?.is_some(), "foo:thing resolves")
        }));

    suite
        .define_module("foo:thing", "integration", seeded().integration(Integration::Enabled))?
        .test("overrides apply to this test", hook(|ctx: &mut TestContext| {
            ctx.register("service:other-thing", Factory::object().with("notTheDefault", true))?;
            ctx.register("foo:needs-service", Factory::object().inject_service("otherThing"))?;
            let foo = ctx.lookup("foo:needs-service")?.ok_or("foo:needs-service is missing")?;
            let thing = foo.injected("otherThing").ok_or("otherThing was not injected")?;
            ensure(thing.is_truthy("notTheDefault"), "override injected")
        }))
        .test("overrides do not leak", hook(|ctx: &mut TestContext| {
            let thing = ctx.lookup("service:other-thing")?.ok_or("service:other-thing is missing")?;
            ensure(thing.is_truthy("fromDefaultRegistry"), "default restored")
        }))
        .test("instances have an owner", hook(|ctx: &mut TestContext| {
            let subject = ctx.subject()?;
            let owner = ctx.owner_of(&subject).ok_or("subject has no owner")?;
            ensure(owner.lookup("service:other-thing")?.is_some(), "owner lookup")
        }));

    let resolver = MapResolver::new().with("component:y-foo", Factory::object().with("name", "Y u no foo?!"))?;
    suite
        .define_module(
            "component:y-foo",
            "custom resolver",
            LifecycleCallbacks::new().resolver(Arc::new(resolver)),
        )?
        .test("subject comes from the custom resolver", hook(|ctx: &mut TestContext| {
            ensure(ctx.subject()?.get_str("name").as_deref() == Some("Y u no foo?!"), "custom name")
        }));

    let writer = fixture.clone();
    let reader = fixture;
    suite
        .define_module("component:x-foo", "fixture reset", seeded())?
        .test("dirties the fixture", hook(move |_: &mut TestContext| {
            writer.set_content("foobar");
            Ok(())
        }))
        .test("fixture is clean again", hook(move |_: &mut TestContext| {
            ensure(reader.content().is_empty(), "fixture was reset")
        }));

    suite
        .define_module("component:x-foo", "configuration", seeded())?
        .test("illegal options are rejected", hook(|_: &mut TestContext| {
            let callbacks = LifecycleCallbacks::new()
                .integration(Integration::Enabled)
                .needs(["component:x-bar"]);
            match TestModule::new("component:x-foo", "", callbacks) {
                Err(e) if e.is_configuration() => Ok(()),
                Err(e) => Err(e),
                Ok(_) => Err("needs with integration was accepted".into()),
            }
        }));

    Ok(suite)
}
