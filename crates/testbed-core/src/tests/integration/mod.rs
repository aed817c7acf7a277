#![cfg(test)]

pub mod common;
pub mod callback_tests;
pub mod context_tests;
pub mod visibility_tests;
pub mod owner_tests;
pub mod external_context_tests;
pub mod resolver_tests;
pub mod fixture_tests;
