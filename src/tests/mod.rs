//! Cross-Module Test Suite
//!
//! Integration scenarios, shared fixtures, and property tests. Module-local
//! unit tests live next to the code they cover.

pub mod common;

mod integration;
mod property;
