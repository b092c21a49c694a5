//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for every service managed by an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceId {
    /// The coordination service (one per environment)
    Zookeeper,
    /// Kafka broker with its zero-based broker index
    Broker(u32),
    /// The optional schema registry
    SchemaRegistry,
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Zookeeper => write!(f, "zookeeper"),
            ServiceId::Broker(id) => write!(f, "broker_{id}"),
            ServiceId::SchemaRegistry => write!(f, "schema_registry"),
        }
    }
}

/// Username/password pair handed out by the credential bootstrap
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Security applied to every listener and client of an environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SecurityMode {
    #[default]
    Plaintext,
    /// SASL/PLAIN authentication with ACL authorization
    SaslPlain { credentials: Credentials },
}

impl SecurityMode {
    pub fn is_enabled(&self) -> bool {
        match self {
            SecurityMode::Plaintext => false,
            SecurityMode::SaslPlain { .. } => true,
        }
    }

    /// Kafka `security.protocol` name for this mode
    pub fn protocol(&self) -> &'static str {
        match self {
            SecurityMode::Plaintext => "PLAINTEXT",
            SecurityMode::SaslPlain { .. } => "SASL_PLAINTEXT",
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            SecurityMode::Plaintext => None,
            SecurityMode::SaslPlain { credentials } => Some(credentials),
        }
    }
}
