//! Process-backed schema registry

use async_trait::async_trait;
use shared::{SecurityMode, ServiceId};
use tempfile::TempDir;
use tokio::process::Command;

use crate::config::ProcessBackendConfig;
use crate::error::EnvironmentResult;
use crate::services::credentials::plain_client_jaas;
use crate::services::process::{ManagedProcess, ReadinessProbe};
use crate::services::properties::Properties;
use crate::traits::{RegistrySpec, ServiceHandle};

pub struct RegistryService {
    spec: RegistrySpec,
    backend: ProcessBackendConfig,
    process: ManagedProcess,
    /// Holds the rendered configuration; removed when the handle is dropped
    config_dir: TempDir,
}

impl RegistryService {
    pub fn new(spec: RegistrySpec, backend: ProcessBackendConfig) -> EnvironmentResult<Self> {
        let url = format!("http://{}:{}", backend.host, spec.port);
        let process = ManagedProcess::new(
            ServiceId::SchemaRegistry,
            ReadinessProbe::Http(format!("{url}/subjects")),
            backend.startup_timeout,
            backend.shutdown_grace,
        );
        let config_dir = tempfile::Builder::new().prefix("inmschemaregistry").tempdir()?;

        Ok(Self {
            spec,
            backend,
            process,
            config_dir,
        })
    }

    /// `kafkastore.bootstrap.servers` value for the backing brokers
    pub fn bootstrap_servers(&self) -> String {
        let protocol = self.spec.security.protocol();
        self.backing_brokers()
            .map(|broker| format!("{protocol}://{broker}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn backing_brokers(&self) -> impl Iterator<Item = &str> {
        self.spec
            .brokers_url
            .split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
    }

    pub fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties
            .set("listeners", self.address())
            .set("host.name", &self.backend.host)
            .set("kafkastore.bootstrap.servers", self.bootstrap_servers())
            .set("kafkastore.topic", "_schemas")
            .set("kafkastore.topic.replication.factor", self.backing_brokers().count())
            .set("debug", false);

        match &self.spec.security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { credentials } => {
                properties
                    .set("kafkastore.security.protocol", self.spec.security.protocol())
                    .set("kafkastore.sasl.mechanism", "PLAIN")
                    .set("kafkastore.sasl.jaas.config", plain_client_jaas(credentials));
            }
        }
        properties
    }

    async fn command(&self) -> EnvironmentResult<Command> {
        let script = self.backend.schema_registry_script();
        ProcessBackendConfig::require(&script)?;

        let config_file = self.config_dir.path().join("schema-registry.properties");
        self.properties().write_to(&config_file).await?;

        let mut command = Command::new(script);
        command
            .arg(&config_file)
            .env("LOG_DIR", self.config_dir.path().join("logs"));
        Ok(command)
    }
}

#[async_trait]
impl ServiceHandle for RegistryService {
    fn id(&self) -> ServiceId {
        ServiceId::SchemaRegistry
    }

    fn address(&self) -> String {
        format!("http://{}:{}", self.backend.host, self.spec.port)
    }

    async fn start(&self) -> EnvironmentResult<()> {
        if self.process.is_running().await {
            return Ok(());
        }
        let command = self.command().await?;
        self.process.spawn(command).await
    }

    async fn stop(&self) -> EnvironmentResult<()> {
        self.process.terminate().await
    }
}
