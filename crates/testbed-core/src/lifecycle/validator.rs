use crate::lifecycle::callbacks::{Integration, LifecycleCallbacks};
use crate::lifecycle::error::ConfigurationError;
use crate::registry::error::RegistryError;
use crate::registry::name::FullName;

/// Which entry point defined a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleKind {
    /// `TestModule::new`
    #[default]
    Unit,
    /// `TestModule::for_component_integration`
    ComponentIntegration,
}

/// The parts of a module definition that survive validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedModule {
    pub subject_name: FullName,
    pub needs: Vec<FullName>,
    pub is_integration: bool,
}

fn reason_of(err: RegistryError) -> String {
    match err {
        RegistryError::MalformedFullName { reason, .. } => reason,
        other => other.to_string(),
    }
}

/// Check a module definition before anything is created
pub fn validate(
    kind: ModuleKind,
    subject_name: &str,
    callbacks: &LifecycleCallbacks,
) -> Result<ValidatedModule, ConfigurationError> {
    let subject = FullName::parse(subject_name).map_err(|e| ConfigurationError::InvalidSubjectName {
        name: subject_name.to_string(),
        reason: reason_of(e),
    })?;

    let needs = callbacks
        .needed()
        .iter()
        .map(|raw| {
            FullName::parse(raw).map_err(|e| ConfigurationError::InvalidNeed {
                name: raw.clone(),
                reason: reason_of(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let is_integration = match callbacks.integration_mode() {
        Integration::Isolated => false,
        Integration::Enabled => {
            if !needs.is_empty() {
                return Err(ConfigurationError::NeedsWithIntegration { subject: subject.to_string() });
            }
            true
        }
        Integration::Legacy => {
            if kind != ModuleKind::ComponentIntegration {
                return Err(ConfigurationError::LegacyIntegrationUnsupported {
                    subject: subject.to_string(),
                });
            }
            false
        }
    };

    Ok(ValidatedModule { subject_name: subject, needs, is_integration })
}
