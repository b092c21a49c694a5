//! Embedded Kafka environment for integration tests
//!
//! Brings up a zookeeper, a topology of zero to two brokers and an optional
//! schema registry, creates the requested topics, and removes every trace of
//! them again on teardown. All external effects go through the collaborator
//! traits in [`traits`]; [`services`] provides the process-backed
//! implementations.

pub mod admin;
pub mod config;
pub mod directories;
pub mod environment;
pub mod error;
pub mod park;
pub mod provisioner;
pub mod services;
pub mod topology;
pub mod traits;

// Re-export commonly used types
pub use admin::{AdminClientConfig, AdminClientFactory};
pub use config::{EnvironmentConfig, EnvironmentConfigBuilder, ProcessBackendConfig};
pub use directories::ResourceDirectoryManager;
pub use environment::{Collaborators, KafkaEnvironment};
pub use error::{EnvironmentError, EnvironmentResult};
pub use park::{BrokerTopologyStatus, LifecycleState, RegistryStatus, ServerPark};
pub use topology::{resolve_broker_count, MAX_BROKERS};
pub use traits::{AdminClient, AdminConnector, CredentialSource, NewTopic, PortAllocator, ServiceFactory, ServiceHandle};
