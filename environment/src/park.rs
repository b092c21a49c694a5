//! Server park: the immutable snapshot of an environment's services
//!
//! Every lifecycle transition builds a new [`ServerPark`]; nothing in a
//! snapshot is ever mutated after construction.

use std::fmt;
use std::sync::Arc;

use crate::traits::ServiceHandle;

/// Lifecycle state of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Initialized,
    Started,
    Stopped,
    /// Terminal
    TornDown,
}

/// Broker topology of an environment
#[derive(Clone)]
pub enum BrokerTopologyStatus {
    Available {
        brokers: Vec<Arc<dyn ServiceHandle>>,
        connection_string: String,
    },
    NotAvailable,
}

impl BrokerTopologyStatus {
    /// Topology over `brokers`, in broker index order
    ///
    /// An empty broker list has no topology.
    pub fn from_brokers(brokers: Vec<Arc<dyn ServiceHandle>>) -> Self {
        if brokers.is_empty() {
            return BrokerTopologyStatus::NotAvailable;
        }

        let connection_string = brokers
            .iter()
            .map(|broker| broker.address())
            .collect::<Vec<_>>()
            .join(",");

        BrokerTopologyStatus::Available {
            brokers,
            connection_string,
        }
    }
}

impl fmt::Debug for BrokerTopologyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerTopologyStatus::Available {
                brokers,
                connection_string,
            } => f
                .debug_struct("Available")
                .field("brokers", &brokers.len())
                .field("connection_string", connection_string)
                .finish(),
            BrokerTopologyStatus::NotAvailable => write!(f, "NotAvailable"),
        }
    }
}

/// Schema registry of an environment
#[derive(Clone)]
pub enum RegistryStatus {
    Available { handle: Arc<dyn ServiceHandle> },
    NotAvailable,
}

impl fmt::Debug for RegistryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryStatus::Available { handle } => f
                .debug_struct("Available")
                .field("address", &handle.address())
                .finish(),
            RegistryStatus::NotAvailable => write!(f, "NotAvailable"),
        }
    }
}

/// Snapshot of all services of an environment and its lifecycle state
#[derive(Clone)]
pub struct ServerPark {
    pub coordinator: Arc<dyn ServiceHandle>,
    pub broker_status: BrokerTopologyStatus,
    pub registry_status: RegistryStatus,
    pub state: LifecycleState,
}

impl ServerPark {
    pub fn new(
        coordinator: Arc<dyn ServiceHandle>,
        broker_status: BrokerTopologyStatus,
        registry_status: RegistryStatus,
    ) -> Self {
        Self {
            coordinator,
            broker_status,
            registry_status,
            state: LifecycleState::Initialized,
        }
    }

    /// Same services, new lifecycle state
    pub fn transition(&self, state: LifecycleState) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            broker_status: self.broker_status.clone(),
            registry_status: self.registry_status.clone(),
            state,
        }
    }

    /// Terminal snapshot: only the coordinator is kept, for inspection
    pub fn torn_down(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            broker_status: BrokerTopologyStatus::NotAvailable,
            registry_status: RegistryStatus::NotAvailable,
            state: LifecycleState::TornDown,
        }
    }

    pub fn brokers(&self) -> Vec<Arc<dyn ServiceHandle>> {
        match &self.broker_status {
            BrokerTopologyStatus::Available { brokers, .. } => brokers.clone(),
            BrokerTopologyStatus::NotAvailable => Vec::new(),
        }
    }

    pub fn connection_string(&self) -> Option<&str> {
        match &self.broker_status {
            BrokerTopologyStatus::Available {
                connection_string, ..
            } => Some(connection_string),
            BrokerTopologyStatus::NotAvailable => None,
        }
    }

    pub fn registry(&self) -> Option<Arc<dyn ServiceHandle>> {
        match &self.registry_status {
            RegistryStatus::Available { handle } => Some(Arc::clone(handle)),
            RegistryStatus::NotAvailable => None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state == LifecycleState::Started
    }
}

impl fmt::Debug for ServerPark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerPark")
            .field("coordinator", &self.coordinator.address())
            .field("broker_status", &self.broker_status)
            .field("registry_status", &self.registry_status)
            .field("state", &self.state)
            .finish()
    }
}
