//! Collaborator traits with mockall annotations for testing
//!
//! The lifecycle controller only ever talks to these traits. The process
//! backend in [`crate::services`] implements all of them; tests substitute
//! mocks or recording fakes.

use std::path::PathBuf;
use std::sync::Arc;

use shared::{Credentials, SecurityMode, ServiceId};

use crate::admin::AdminClientConfig;
use crate::error::EnvironmentResult;

/// Everything needed to build the coordination service
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSpec {
    pub port: u16,
    pub data_dir: PathBuf,
    pub security: SecurityMode,
}

/// Everything needed to build one broker of the topology
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerSpec {
    pub id: u32,
    /// Number of brokers in the topology, this one included
    pub peer_count: u32,
    pub port: u16,
    pub data_dir: PathBuf,
    pub coordinator_address: String,
    pub security: SecurityMode,
}

/// Everything needed to build the schema registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySpec {
    pub port: u16,
    /// Connection string of the broker topology backing the registry
    pub brokers_url: String,
    pub security: SecurityMode,
}

/// A topic creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i16,
}

impl NewTopic {
    pub fn new(name: impl Into<String>, partitions: i32, replication_factor: i16) -> Self {
        Self {
            name: name.into(),
            partitions,
            replication_factor,
        }
    }
}

/// A managed service the environment sequences
///
/// `start` and `stop` are idempotent and only return once the service is
/// ready, respectively fully released. `address` is stable once started.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ServiceHandle: Send + Sync {
    fn id(&self) -> ServiceId;

    fn address(&self) -> String;

    async fn start(&self) -> EnvironmentResult<()>;

    async fn stop(&self) -> EnvironmentResult<()>;
}

/// Builds unstarted service handles
#[mockall::automock]
pub trait ServiceFactory: Send + Sync {
    fn coordinator(&self, spec: CoordinatorSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>>;

    fn broker(&self, spec: BrokerSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>>;

    fn registry(&self, spec: RegistrySpec) -> EnvironmentResult<Arc<dyn ServiceHandle>>;
}

/// Hands out a port that is free at the time of the call
#[mockall::automock]
pub trait PortAllocator: Send + Sync {
    fn available_port(&self) -> EnvironmentResult<u16>;
}

/// Security credential bootstrap, consulted only in security mode
#[mockall::automock]
pub trait CredentialSource: Send + Sync {
    fn bootstrap(&self) -> EnvironmentResult<Credentials>;
}

/// Administrative connection to a broker topology
#[mockall::automock]
#[async_trait::async_trait]
pub trait AdminClient: Send + Sync {
    /// Submit one batched create-topics request
    async fn create_topics(&self, topics: Vec<NewTopic>) -> EnvironmentResult<()>;

    async fn list_topics(&self) -> EnvironmentResult<Vec<String>>;

    /// Release every resource held by the client
    async fn close(&self) -> EnvironmentResult<()>;
}

/// Opens admin clients from a client configuration
#[mockall::automock]
#[async_trait::async_trait]
pub trait AdminConnector: Send + Sync {
    async fn connect(&self, config: AdminClientConfig) -> EnvironmentResult<Box<dyn AdminClient>>;
}
