//! Shared types for the embedded Kafka test environment
//!
//! Contains the identifiers, security types and logging facility used by
//! both the environment library and the `kafkaenv` binary.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
