//! Common test utilities and infrastructure
//!
//! Recording fakes for every collaborator so lifecycle tests can assert on
//! the exact order of service operations.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{EventLog, Harness};
