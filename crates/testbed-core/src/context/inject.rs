use crate::context::test_context::TestContext;
use crate::kernel::constants::SERVICE_KIND;
use crate::kernel::error::Result;
use crate::object::Instance;
use crate::registry::name::{normalize_identifier, FullName};

/// Binds looked-up dependencies onto a test context as properties.
///
/// Obtained through [`TestContext::inject`].
#[derive(Debug)]
pub struct Injector<'a> {
    context: &'a mut TestContext,
}

impl<'a> Injector<'a> {
    pub(crate) fn new(context: &'a mut TestContext) -> Self {
        Self { context }
    }

    /// Look up `service:<name>` and store it on the context under `name`
    pub fn service(self, name: &str) -> Result<Option<Instance>> {
        self.aspect(SERVICE_KIND, name)
    }

    /// Look up `<kind>:<name>` and store it on the context under `name`.
    /// A camel-cased `name` is dasherized for the lookup.
    pub fn aspect(self, kind: &str, name: &str) -> Result<Option<Instance>> {
        let full_name = FullName::new(kind, &normalize_identifier(name))?;
        self.aspect_as(&full_name, name)
    }

    /// Look up `full_name` and store it under `property`
    pub fn aspect_as(self, full_name: &FullName, property: &str) -> Result<Option<Instance>> {
        let found = self.context.container()?.lookup_name(full_name)?;
        match &found {
            Some(instance) => self.context.set_instance(property, instance.clone()),
            None => log::debug!("inject: {} not found, '{}' left unset", full_name, property),
        }
        Ok(found)
    }
}
