//! Test infrastructure for the field mapper.
//!
//! Provides the test mapper types and assertion helpers shared by the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
