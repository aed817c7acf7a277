/// Application name
pub const APP_NAME: &str = "testbed";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the label a bound test context renders through `Display`
pub const CONTEXT_LABEL_PREFIX: &str = "test context for: ";

/// Identifier attached to deprecation warnings raised by the property fallback
pub const MODULE_PROPERTY_DEPRECATION_ID: &str = "testbed.test-module-property";

/// Kind used by `inject().service(..)`
pub const SERVICE_KIND: &str = "service";

/// Separator between the kind and identifier halves of a full name
pub const FULL_NAME_SEPARATOR: char = ':';

/// Default harness configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "testbed.toml";

/// Default log filter used by the binary when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
