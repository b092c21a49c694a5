//! Process backend
//!
//! Real implementations of every collaborator trait. Services run from a
//! local Kafka (and optionally Schema Registry) distribution.

pub mod admin_cli;
pub mod broker;
pub mod credentials;
pub mod factory;
pub mod ports;
pub mod process;
pub mod properties;
pub mod registry;
pub mod zookeeper;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use admin_cli::{ScriptAdminClient, ScriptAdminConnector};
pub use broker::BrokerService;
pub use credentials::{EnvCredentialSource, StaticCredentialSource};
pub use factory::ProcessServiceFactory;
pub use ports::LocalPortAllocator;
pub use process::{ManagedProcess, ReadinessProbe};
pub use properties::Properties;
pub use registry::RegistryService;
pub use zookeeper::ZookeeperService;

use crate::config::ProcessBackendConfig;
use crate::environment::Collaborators;

impl Collaborators {
    /// Collaborators running everything from a local distribution
    pub fn process(backend: ProcessBackendConfig) -> Self {
        Self {
            services: Arc::new(ProcessServiceFactory::new(backend.clone())),
            ports: Arc::new(LocalPortAllocator),
            credentials: Arc::new(EnvCredentialSource::new()),
            admin: Arc::new(ScriptAdminConnector::new(backend)),
        }
    }
}
