#![cfg(test)]

use crate::context::TestContext;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::{hook, Integration, LifecycleCallbacks, TestModule};
use crate::tests::integration::common::seed_registry;

fn owner_module() -> TestModule {
    let callbacks = LifecycleCallbacks::new()
        .before_setup(seed_registry())
        .integration(Integration::Enabled);
    TestModule::new("foo:thing", "should be able to use `get_owner` on instances", callbacks).unwrap()
}

fn from_default(found: Option<crate::object::Instance>) -> Result<()> {
    match found {
        Some(thing) if thing.is_truthy("fromDefaultRegistry") => Ok(()),
        _ => Err(Error::Other("owner lookup did not reach the default registry".to_string())),
    }
}

#[tokio::test]
async fn test_instances_get_an_owner() {
    let mut module = owner_module();
    let body = hook(|ctx: &mut TestContext| {
        let subject = ctx.subject()?;
        let owner = ctx.owner_of(&subject).ok_or("the subject should have an owner")?;
        from_default(owner.lookup("service:other-thing")?)
    });
    module.run_test("instances get an owner", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_context_gets_an_owner() {
    let mut module = owner_module();
    let body = hook(|ctx: &mut TestContext| {
        let owner = ctx.get_owner()?;
        from_default(owner.lookup("service:other-thing")?)
    });
    module.run_test("test context gets an owner", body.as_ref()).await.unwrap();
}

#[tokio::test]
async fn test_owner_is_gone_after_teardown() {
    let mut module = owner_module();
    module.setup().await.unwrap();
    let container = module.context().unwrap().get_owner().unwrap();
    let subject = module.context_mut().unwrap().subject().unwrap();
    module.teardown().await.unwrap();

    assert!(container.is_destroyed());
    assert!(container.owner_of(&subject).is_none());
    assert!(subject.is_destroyed());
}
