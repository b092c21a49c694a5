//! Shared error types for the embedded Kafka test environment

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

impl SharedError {
    pub fn invalid_config(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            value: value.into(),
        }
    }
}
