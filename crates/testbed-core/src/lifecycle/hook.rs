use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::TestContext;
use crate::kernel::error::Result;
use crate::lifecycle::module::TestModule;

/// Boxed future returned by closures passed to [`async_hook`]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A lifecycle callback or test body run against a receiver.
///
/// `before_setup` and `after_teardown` receive the [`TestModule`]; `setup`,
/// the test body and `teardown` receive the [`TestContext`].
#[async_trait]
pub trait Hook<T: Send + 'static>: Send + Sync {
    async fn call(&self, receiver: &mut T) -> Result<()>;
}

/// Hook receiving the module scope
pub type ModuleHook = Arc<dyn Hook<TestModule>>;

/// Hook receiving the test context; also the type of a test body
pub type ContextHook = Arc<dyn Hook<TestContext>>;

struct FnHook<F>(F);

#[async_trait]
impl<T, F> Hook<T> for FnHook<F>
where
    T: Send + 'static,
    F: Fn(&mut T) -> Result<()> + Send + Sync,
{
    async fn call(&self, receiver: &mut T) -> Result<()> {
        (self.0)(receiver)
    }
}

struct AsyncFnHook<F>(F);

#[async_trait]
impl<T, F> Hook<T> for AsyncFnHook<F>
where
    T: Send + 'static,
    F: for<'a> Fn(&'a mut T) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    async fn call(&self, receiver: &mut T) -> Result<()> {
        (self.0)(receiver).await
    }
}

/// Wrap a synchronous closure as a hook
pub fn hook<T, F>(f: F) -> Arc<dyn Hook<T>>
where
    T: Send + 'static,
    F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnHook(f))
}

/// Wrap a closure returning a boxed future as a hook:
///
/// ```ignore
/// async_hook(|ctx: &mut TestContext| Box::pin(async move {
///     ctx.set("ready", true);
///     Ok(())
/// }))
/// ```
pub fn async_hook<T, F>(f: F) -> Arc<dyn Hook<T>>
where
    T: Send + 'static,
    F: for<'a> Fn(&'a mut T) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
    Arc::new(AsyncFnHook(f))
}
