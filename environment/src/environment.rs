//! The embedded Kafka environment and its lifecycle
//!
//! A [`KafkaEnvironment`] owns one zookeeper, zero to two brokers and an
//! optional schema registry. The services are built once at construction;
//! `start`, `stop` and `tear_down` only sequence them and swap in a new
//! [`ServerPark`] snapshot.

use std::sync::Arc;

use shared::{service_info, SecurityMode, SharedError};
use tracing::info;

use crate::admin::AdminClientFactory;
use crate::config::EnvironmentConfig;
use crate::directories::ResourceDirectoryManager;
use crate::error::EnvironmentResult;
use crate::park::{BrokerTopologyStatus, LifecycleState, RegistryStatus, ServerPark};
use crate::provisioner::TopicProvisioner;
use crate::topology::resolve_broker_count;
use crate::traits::{
    AdminClient, AdminConnector, BrokerSpec, CoordinatorSpec, CredentialSource, PortAllocator, RegistrySpec,
    ServiceFactory, ServiceHandle,
};

/// The external collaborators an environment is built from
#[derive(Clone)]
pub struct Collaborators {
    pub services: Arc<dyn ServiceFactory>,
    pub ports: Arc<dyn PortAllocator>,
    pub credentials: Arc<dyn CredentialSource>,
    pub admin: Arc<dyn AdminConnector>,
}

/// An in-process Kafka environment for integration tests
///
/// Not meant to be driven from several tasks at once: every operation takes
/// `&mut self`.
pub struct KafkaEnvironment {
    park: ServerPark,
    broker_count: u32,
    directories: ResourceDirectoryManager,
    admin: AdminClientFactory,
    provisioner: TopicProvisioner,
}

impl KafkaEnvironment {
    /// Build the environment, and start it when `auto_start` is set
    pub async fn new(config: EnvironmentConfig, collaborators: Collaborators) -> EnvironmentResult<Self> {
        let broker_count = resolve_broker_count(config.brokers, &config.topics, config.with_schema_registry);
        let directories = ResourceDirectoryManager::prepare(&config.data_root, broker_count).await;

        let security = if config.secure {
            SecurityMode::SaslPlain {
                credentials: collaborators.credentials.bootstrap()?,
            }
        } else {
            SecurityMode::Plaintext
        };

        let coordinator = collaborators.services.coordinator(CoordinatorSpec {
            port: collaborators.ports.available_port()?,
            data_dir: directories.coordinator_dir().to_path_buf(),
            security: security.clone(),
        })?;

        let brokers = directories
            .broker_dirs()
            .iter()
            .zip(0..broker_count)
            .map(|(data_dir, id)| {
                collaborators.services.broker(BrokerSpec {
                    id,
                    peer_count: broker_count,
                    port: collaborators.ports.available_port()?,
                    data_dir: data_dir.clone(),
                    coordinator_address: coordinator.address(),
                    security: security.clone(),
                })
            })
            .collect::<EnvironmentResult<Vec<_>>>()?;

        let broker_status = BrokerTopologyStatus::from_brokers(brokers);

        let registry_status = match (config.with_schema_registry, &broker_status) {
            (false, _) => RegistryStatus::NotAvailable,
            (
                true,
                BrokerTopologyStatus::Available {
                    connection_string, ..
                },
            ) => RegistryStatus::Available {
                handle: collaborators.services.registry(RegistrySpec {
                    port: collaborators.ports.available_port()?,
                    brokers_url: connection_string.clone(),
                    security: security.clone(),
                })?,
            },
            (true, BrokerTopologyStatus::NotAvailable) => {
                return Err(SharedError::invalid_config("with_schema_registry", "no brokers to back it").into());
            }
        };

        info!(
            "📋 Environment resolved to {} broker(s), schema registry: {}, security: {}",
            broker_count,
            config.with_schema_registry,
            security.protocol()
        );

        let mut environment = Self {
            park: ServerPark::new(coordinator, broker_status, registry_status),
            broker_count,
            directories,
            admin: AdminClientFactory::new(collaborators.admin, security),
            provisioner: TopicProvisioner::new(config.topics),
        };

        if config.auto_start {
            environment.start().await?;
        }

        Ok(environment)
    }

    /// Start zookeeper, then the brokers, then the schema registry
    ///
    /// Requested topics are created after the first successful start.
    pub async fn start(&mut self) -> EnvironmentResult<()> {
        match self.park.state {
            LifecycleState::Started | LifecycleState::TornDown => return Ok(()),
            LifecycleState::Initialized | LifecycleState::Stopped => {}
        }

        let park = self.park.clone();

        service_info!(park.coordinator.id(), "🚀 Starting zookeeper - {}", park.coordinator.address());
        park.coordinator.start().await?;

        match &park.broker_status {
            BrokerTopologyStatus::Available {
                brokers,
                connection_string,
            } => {
                info!("🚀 Starting kafka broker(s) - {}", connection_string);
                for broker in brokers {
                    broker.start().await?;
                }
            }
            BrokerTopologyStatus::NotAvailable => {}
        }

        match &park.registry_status {
            RegistryStatus::Available { handle } => {
                service_info!(handle.id(), "🚀 Starting schema registry - {}", handle.address());
                handle.start().await?;
            }
            RegistryStatus::NotAvailable => {}
        }

        self.park = park.transition(LifecycleState::Started);
        self.provisioner.provision(&self.park, &self.admin).await
    }

    /// Stop the schema registry, then the brokers, then zookeeper
    pub async fn stop(&mut self) -> EnvironmentResult<()> {
        match self.park.state {
            LifecycleState::Stopped | LifecycleState::TornDown => return Ok(()),
            LifecycleState::Initialized | LifecycleState::Started => {}
        }

        let park = self.park.clone();

        match &park.registry_status {
            RegistryStatus::Available { handle } => {
                service_info!(handle.id(), "🛑 Stopping schema registry - {}", handle.address());
                handle.stop().await?;
            }
            RegistryStatus::NotAvailable => {}
        }

        match &park.broker_status {
            BrokerTopologyStatus::Available {
                brokers,
                connection_string,
            } => {
                info!("🛑 Stopping kafka broker(s) - {}", connection_string);
                for broker in brokers {
                    broker.stop().await?;
                }
            }
            BrokerTopologyStatus::NotAvailable => {}
        }

        service_info!(park.coordinator.id(), "🛑 Stopping zookeeper");
        park.coordinator.stop().await?;

        self.park = park.transition(LifecycleState::Stopped);
        Ok(())
    }

    /// Stop a running environment and remove all of its data
    ///
    /// From `Initialized` no service is stopped; the directories are still
    /// removed. The environment cannot be started again afterwards.
    pub async fn tear_down(&mut self) -> EnvironmentResult<()> {
        match self.park.state {
            LifecycleState::TornDown => return Ok(()),
            LifecycleState::Started => self.stop().await?,
            LifecycleState::Initialized | LifecycleState::Stopped => {}
        }

        self.directories.clean_up().await;
        self.park = self.park.torn_down();
        info!("✅ Environment torn down");
        Ok(())
    }

    pub fn state(&self) -> LifecycleState {
        self.park.state
    }

    /// Snapshot of the current services and state
    pub fn server_park(&self) -> ServerPark {
        self.park.clone()
    }

    pub fn zookeeper(&self) -> Arc<dyn ServiceHandle> {
        Arc::clone(&self.park.coordinator)
    }

    /// Brokers in index order, empty without a broker topology
    pub fn brokers(&self) -> Vec<Arc<dyn ServiceHandle>> {
        self.park.brokers()
    }

    pub fn connection_string(&self) -> Option<String> {
        self.park.connection_string().map(str::to_string)
    }

    /// Admin client for the running brokers, `None` unless started
    ///
    /// The caller owns the client and should `close` it when done.
    pub async fn admin_client(&self) -> EnvironmentResult<Option<Box<dyn AdminClient>>> {
        self.admin.create(&self.park).await
    }

    /// Schema registry handle, `None` unless configured and started
    pub fn schema_registry(&self) -> Option<Arc<dyn ServiceHandle>> {
        match self.park.state {
            LifecycleState::Started => self.park.registry(),
            LifecycleState::Initialized | LifecycleState::Stopped | LifecycleState::TornDown => None,
        }
    }

    pub fn broker_count(&self) -> u32 {
        self.broker_count
    }

    pub fn topics(&self) -> &[String] {
        self.provisioner.topics()
    }

    pub fn topics_provisioned(&self) -> bool {
        self.provisioner.is_provisioned()
    }

    pub fn security(&self) -> &SecurityMode {
        self.admin.security()
    }

    pub fn directories(&self) -> &ResourceDirectoryManager {
        &self.directories
    }
}
