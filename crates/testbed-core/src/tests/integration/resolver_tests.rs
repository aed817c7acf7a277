#![cfg(test)]

use std::sync::Arc;

use crate::context::TestContext;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::{hook, LifecycleCallbacks, TestModule};
use crate::object::Factory;
use crate::registry::{FullName, MapResolver};

fn custom_resolver_module() -> TestModule {
    let resolver = MapResolver::new()
        .with("component:y-foo", Factory::object().with("name", "Y u no foo?!"))
        .unwrap();
    let callbacks = LifecycleCallbacks::new().resolver(Arc::new(resolver));
    TestModule::new("component:y-foo", "Custom resolver", callbacks).unwrap()
}

fn expect_eq(actual: &str, expected: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::Other(format!("expected {:?}, got {:?}", expected, actual)))
    }
}

#[tokio::test]
async fn test_subject_created_using_custom_resolver() {
    let mut module = custom_resolver_module();
    let body = hook(|ctx: &mut TestContext| {
        let name = ctx.subject()?.get_str("name").unwrap_or_default();
        expect_eq(&name, "Y u no foo?!")
    });
    module.run_test("subject created using custom resolver", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_display_returns_the_test_subject() {
    let mut module = custom_resolver_module();
    let body = hook(|ctx: &mut TestContext| expect_eq(&ctx.to_string(), "test context for: component:y-foo"));
    module.run_test("display returns the test subject", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_custom_resolver_ignores_seeded_defaults() {
    let mut module = custom_resolver_module();
    module.seed("foo:thing", Factory::object()).unwrap();
    let body = hook(|ctx: &mut TestContext| {
        let container = ctx.container()?;
        match container.factory_for(&FullName::parse("foo:thing")?)? {
            None => Ok(()),
            Some(_) => Err("defaults should be bypassed by the custom resolver".into()),
        }
    });
    module.run_test("defaults bypassed", body.as_ref()).await.unwrap();
}
