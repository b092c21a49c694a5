//! Service-specific tests
//!
//! Each backend service has its own test file; shared helpers live in
//! `common`.

mod ports;
mod properties;

pub mod common {
    use std::path::Path;

    use shared::{Credentials, SecurityMode};

    use crate::config::ProcessBackendConfig;

    pub fn backend() -> ProcessBackendConfig {
        ProcessBackendConfig::new("/opt/kafka").with_schema_registry_home("/opt/confluent")
    }

    pub fn backend_at(kafka_home: &Path) -> ProcessBackendConfig {
        ProcessBackendConfig::new(kafka_home)
    }

    pub fn secure() -> SecurityMode {
        SecurityMode::SaslPlain {
            credentials: Credentials::new("srvkafkaclient", "kafkaclient"),
        }
    }
}
