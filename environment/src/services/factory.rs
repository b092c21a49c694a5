//! Service factory for the process backend

use std::sync::Arc;

use crate::config::ProcessBackendConfig;
use crate::error::EnvironmentResult;
use crate::services::broker::BrokerService;
use crate::services::registry::RegistryService;
use crate::services::zookeeper::ZookeeperService;
use crate::traits::{BrokerSpec, CoordinatorSpec, RegistrySpec, ServiceFactory, ServiceHandle};

/// Builds services that run from a local Kafka / Schema Registry distribution
#[derive(Debug, Clone)]
pub struct ProcessServiceFactory {
    backend: ProcessBackendConfig,
}

impl ProcessServiceFactory {
    pub fn new(backend: ProcessBackendConfig) -> Self {
        Self { backend }
    }
}

impl ServiceFactory for ProcessServiceFactory {
    fn coordinator(&self, spec: CoordinatorSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        Ok(Arc::new(ZookeeperService::new(spec, self.backend.clone())))
    }

    fn broker(&self, spec: BrokerSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        Ok(Arc::new(BrokerService::new(spec, self.backend.clone())))
    }

    fn registry(&self, spec: RegistrySpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        Ok(Arc::new(RegistryService::new(spec, self.backend.clone())?))
    }
}
