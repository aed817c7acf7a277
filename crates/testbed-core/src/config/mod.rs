//! # Testbed Core Harness Configuration
//!
//! Settings that shape how modules run: how deprecations are reported,
//! whether the fixture surface is reset after each test, whether lifecycle
//! transitions are traced, and whether a suite stops at the first failure.
//! Loadable from JSON, YAML (`yaml-config`) or TOML (`toml-config`) files.
pub mod error;
pub mod harness;

pub use error::ConfigError;
pub use harness::{ConfigFormat, DeprecationPolicy, HarnessConfig};
