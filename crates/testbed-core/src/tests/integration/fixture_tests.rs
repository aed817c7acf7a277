#![cfg(test)]

use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::context::TestContext;
use crate::fixture::{FixtureSurface, InMemoryFixture};
use crate::lifecycle::{hook, LifecycleCallbacks, TestModule};
use crate::object::Factory;
use crate::suite::Suite;

fn seeded() -> LifecycleCallbacks {
    LifecycleCallbacks::new().before_setup(hook(|m: &mut TestModule| {
        m.seed("component:x-foo", Factory::object())
    }))
}

#[tokio::test]
async fn test_fixture_resets_to_empty_value() {
    let fixture = InMemoryFixture::new("ember-testing");
    let mut suite = Suite::new("fixture").with_fixture(Arc::new(fixture.clone()));

    let writer = fixture.clone();
    let reader = fixture.clone();
    suite
        .define_module("component:x-foo", "resets to empty value", seeded())
        .unwrap()
        .test("sets content to foobar", hook(move |_: &mut TestContext| {
            writer.set_content("foobar");
            Ok(())
        }))
        .test("content should be reset", hook(move |_: &mut TestContext| {
            if reader.content().is_empty() {
                Ok(())
            } else {
                Err(format!("fixture not reset: {:?}", reader.content()).into())
            }
        }));

    let report = suite.run().await;
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(fixture.content(), "");
}

#[tokio::test]
async fn test_fixture_resets_to_non_empty_value() {
    let fixture = InMemoryFixture::new("ember-testing");
    fixture.set_content("<div>foobar</div>");

    let mut module = TestModule::new("component:x-foo", "Foo", LifecycleCallbacks::new())
        .unwrap()
        .with_fixture(Arc::new(fixture.clone()));
    module.set_context(TestContext::detached()).unwrap();
    module.setup().await.unwrap();
    fixture.set_content("");
    module.teardown().await.unwrap();

    assert_eq!(fixture.content(), "<div>foobar</div>");
}

#[tokio::test]
async fn test_fixture_reset_happens_after_teardown_callback() {
    let fixture = InMemoryFixture::new("main");
    let in_teardown = fixture.clone();
    let callbacks = LifecycleCallbacks::new().teardown(hook(move |_: &mut TestContext| {
        // Still dirty while the callback runs
        assert_eq!(in_teardown.content(), "dirty");
        in_teardown.set_content("dirtier");
        Ok(())
    }));
    let mut module = TestModule::new("component:x-foo", "", callbacks)
        .unwrap()
        .with_fixture(Arc::new(fixture.clone()));

    module.setup().await.unwrap();
    fixture.set_content("dirty");
    module.teardown().await.unwrap();
    assert_eq!(fixture.content(), "");
}

#[tokio::test]
async fn test_reset_can_be_disabled() {
    let fixture = InMemoryFixture::new("main");
    let config = HarnessConfig { reset_fixture: false, ..HarnessConfig::default() };
    let mut module = TestModule::new("component:x-foo", "", LifecycleCallbacks::new())
        .unwrap()
        .with_config(config)
        .with_fixture(Arc::new(fixture.clone()));

    module.setup().await.unwrap();
    fixture.set_content("left behind");
    module.teardown().await.unwrap();
    assert_eq!(fixture.content(), "left behind");
}
