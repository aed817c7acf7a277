//! # Testbed Core Kernel
//!
//! The `kernel` module holds the pieces every other subsystem leans on:
//!
//! - **Error Handling**: the crate-wide [`Error`](error::Error) aggregate and
//!   its `Result` alias, in the `error` submodule. Each subsystem keeps its own
//!   typed error enum and converts into this one with `?`.
//! - **Core Constants**: labels, event names and defaults shared across the
//!   harness, in the `constants` submodule.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
