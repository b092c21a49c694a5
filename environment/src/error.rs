//! Environment-specific error types

use shared::{ServiceId, SharedError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to start {service}: {reason}")]
    ServiceStart { service: ServiceId, reason: String },

    #[error("Failed to stop {service}: {reason}")]
    ServiceStop { service: ServiceId, reason: String },

    #[error("{service} was not ready within {timeout:?}")]
    StartupTimeout { service: ServiceId, timeout: Duration },

    #[error("No free port available: {source}")]
    PortAllocation { source: std::io::Error },

    #[error("Credential bootstrap failed: {message}")]
    Credentials { message: String },

    #[error("Admin client error: {message}")]
    AdminClient { message: String },

    #[error("Topic creation failed: {message}")]
    TopicCreation { message: String },

    #[error("Distribution not usable: {path}")]
    Distribution { path: PathBuf },

    #[error("Shared component error")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnvironmentError {
    pub fn start(service: ServiceId, reason: impl Into<String>) -> Self {
        Self::ServiceStart {
            service,
            reason: reason.into(),
        }
    }

    pub fn stop(service: ServiceId, reason: impl Into<String>) -> Self {
        Self::ServiceStop {
            service,
            reason: reason.into(),
        }
    }

    pub fn admin(message: impl Into<String>) -> Self {
        Self::AdminClient {
            message: message.into(),
        }
    }

    pub fn topics(message: impl Into<String>) -> Self {
        Self::TopicCreation {
            message: message.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;
