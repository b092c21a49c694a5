//! Recording fakes and the harness wiring them into an environment

use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use environment::services::StaticCredentialSource;
use environment::traits::{BrokerSpec, CoordinatorSpec, RegistrySpec};
use environment::{
    AdminClient, AdminClientConfig, AdminConnector, Collaborators, EnvironmentConfig, EnvironmentConfigBuilder,
    EnvironmentError, EnvironmentResult, KafkaEnvironment, NewTopic, PortAllocator, ServiceFactory, ServiceHandle,
};
use shared::ServiceId;
use tempfile::TempDir;

use super::fixtures::TestFixtures;

/// Ordered record of everything the fakes were asked to do
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.lock().unwrap().iter().position(|e| e == event)
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

/// Service handle recording every `start:<id>` and `stop:<id>` call
pub struct FakeService {
    id: ServiceId,
    address: String,
    events: EventLog,
    fail_start: bool,
}

#[async_trait]
impl ServiceHandle for FakeService {
    fn id(&self) -> ServiceId {
        self.id
    }

    fn address(&self) -> String {
        self.address.clone()
    }

    async fn start(&self) -> EnvironmentResult<()> {
        if self.fail_start {
            self.events.record(format!("failed:{}", self.id));
            return Err(EnvironmentError::start(self.id, "refused to start"));
        }
        self.events.record(format!("start:{}", self.id));
        Ok(())
    }

    async fn stop(&self) -> EnvironmentResult<()> {
        self.events.record(format!("stop:{}", self.id));
        Ok(())
    }
}

/// Service factory building [`FakeService`]s and keeping every spec
#[derive(Default)]
pub struct RecordingFactory {
    events: EventLog,
    failing: Option<ServiceId>,
    pub coordinators: Mutex<Vec<CoordinatorSpec>>,
    pub brokers: Mutex<Vec<BrokerSpec>>,
    pub registries: Mutex<Vec<RegistrySpec>>,
}

impl RecordingFactory {
    fn service(&self, id: ServiceId, address: String) -> Arc<dyn ServiceHandle> {
        Arc::new(FakeService {
            id,
            address,
            events: self.events.clone(),
            fail_start: self.failing == Some(id),
        })
    }
}

impl ServiceFactory for RecordingFactory {
    fn coordinator(&self, spec: CoordinatorSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        let address = TestFixtures::address(spec.port);
        self.coordinators.lock().unwrap().push(spec);
        Ok(self.service(ServiceId::Zookeeper, address))
    }

    fn broker(&self, spec: BrokerSpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        let service = self.service(ServiceId::Broker(spec.id), TestFixtures::address(spec.port));
        self.brokers.lock().unwrap().push(spec);
        Ok(service)
    }

    fn registry(&self, spec: RegistrySpec) -> EnvironmentResult<Arc<dyn ServiceHandle>> {
        let address = format!("http://{}", TestFixtures::address(spec.port));
        self.registries.lock().unwrap().push(spec);
        Ok(self.service(ServiceId::SchemaRegistry, address))
    }
}

/// Hands out consecutive ports starting at [`TestFixtures::FIRST_PORT`]
pub struct SequentialPorts {
    next: AtomicU16,
}

impl Default for SequentialPorts {
    fn default() -> Self {
        Self {
            next: AtomicU16::new(TestFixtures::FIRST_PORT),
        }
    }
}

impl PortAllocator for SequentialPorts {
    fn available_port(&self) -> EnvironmentResult<u16> {
        Ok(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Admin connector whose clients record `admin:create:<topic>` and `admin:close`
///
/// The first `create_failures` create requests are rejected.
#[derive(Default)]
pub struct RecordingConnector {
    events: EventLog,
    create_failures: Arc<AtomicUsize>,
    pub configs: Mutex<Vec<AdminClientConfig>>,
    pub created: Arc<Mutex<Vec<NewTopic>>>,
}

#[async_trait]
impl AdminConnector for RecordingConnector {
    async fn connect(&self, config: AdminClientConfig) -> EnvironmentResult<Box<dyn AdminClient>> {
        self.events.record("admin:connect");
        self.configs.lock().unwrap().push(config);
        Ok(Box::new(RecordingAdminClient {
            events: self.events.clone(),
            create_failures: Arc::clone(&self.create_failures),
            created: Arc::clone(&self.created),
        }))
    }
}

struct RecordingAdminClient {
    events: EventLog,
    create_failures: Arc<AtomicUsize>,
    created: Arc<Mutex<Vec<NewTopic>>>,
}

#[async_trait]
impl AdminClient for RecordingAdminClient {
    async fn create_topics(&self, topics: Vec<NewTopic>) -> EnvironmentResult<()> {
        let rejected = self
            .create_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if rejected {
            self.events.record("admin:create-failed");
            return Err(EnvironmentError::topics("broker rejected the request"));
        }
        for topic in &topics {
            self.events.record(format!("admin:create:{}", topic.name));
        }
        self.created.lock().unwrap().extend(topics);
        Ok(())
    }

    async fn list_topics(&self) -> EnvironmentResult<Vec<String>> {
        Ok(self
            .created
            .lock()
            .unwrap()
            .iter()
            .map(|topic| topic.name.clone())
            .collect())
    }

    async fn close(&self) -> EnvironmentResult<()> {
        self.events.record("admin:close");
        Ok(())
    }
}

/// Recording collaborators plus a private data root
pub struct Harness {
    pub events: EventLog,
    pub factory: Arc<RecordingFactory>,
    pub admin: Arc<RecordingConnector>,
    pub data_root: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(None, 0)
    }

    /// Harness whose service `id` fails to start
    pub fn failing_start(id: ServiceId) -> Self {
        Self::build(Some(id), 0)
    }

    /// Harness whose admin clients reject the first topic creation
    pub fn failing_topics_once() -> Self {
        Self::build(None, 1)
    }

    fn build(failing: Option<ServiceId>, create_failures: usize) -> Self {
        let events = EventLog::default();
        Self {
            factory: Arc::new(RecordingFactory {
                events: events.clone(),
                failing,
                ..Default::default()
            }),
            admin: Arc::new(RecordingConnector {
                events: events.clone(),
                create_failures: Arc::new(AtomicUsize::new(create_failures)),
                ..Default::default()
            }),
            events,
            data_root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            services: self.factory.clone(),
            ports: Arc::new(SequentialPorts::default()),
            credentials: Arc::new(StaticCredentialSource::new(TestFixtures::credentials())),
            admin: self.admin.clone(),
        }
    }

    /// Config builder pointed at this harness's data root
    pub fn config(&self) -> EnvironmentConfigBuilder {
        EnvironmentConfig::builder().data_root(self.data_root.path())
    }

    pub async fn environment(&self, config: EnvironmentConfigBuilder) -> KafkaEnvironment {
        KafkaEnvironment::new(config.build(), self.collaborators())
            .await
            .unwrap()
    }

    pub fn created_topics(&self) -> Vec<NewTopic> {
        self.admin.created.lock().unwrap().clone()
    }
}
