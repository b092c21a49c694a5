//! Process-backed zookeeper

use async_trait::async_trait;
use shared::{SecurityMode, ServiceId};
use tokio::fs;
use tokio::process::Command;

use crate::config::ProcessBackendConfig;
use crate::error::EnvironmentResult;
use crate::services::credentials::zookeeper_jaas;
use crate::services::process::{ManagedProcess, ReadinessProbe};
use crate::services::properties::Properties;
use crate::traits::{CoordinatorSpec, ServiceHandle};

pub struct ZookeeperService {
    spec: CoordinatorSpec,
    backend: ProcessBackendConfig,
    process: ManagedProcess,
}

impl ZookeeperService {
    pub fn new(spec: CoordinatorSpec, backend: ProcessBackendConfig) -> Self {
        let process = ManagedProcess::new(
            ServiceId::Zookeeper,
            ReadinessProbe::Tcp(format!("{}:{}", backend.host, spec.port)),
            backend.startup_timeout,
            backend.shutdown_grace,
        );
        Self { spec, backend, process }
    }

    pub fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties
            .set("dataDir", self.spec.data_dir.join("data").display())
            .set("clientPort", self.spec.port)
            .set("clientPortAddress", &self.backend.host)
            .set("maxClientCnxns", 0)
            .set("admin.enableServer", false)
            .set("tickTime", 2000);

        match &self.spec.security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { .. } => {
                properties
                    .set("authProvider.1", "org.apache.zookeeper.server.auth.SASLAuthenticationProvider")
                    .set("requireClientAuthScheme", "sasl");
            }
        }
        properties
    }

    async fn command(&self) -> EnvironmentResult<Command> {
        let script = self.backend.zookeeper_script();
        ProcessBackendConfig::require(&script)?;

        let data_dir = &self.spec.data_dir;
        fs::create_dir_all(data_dir.join("data")).await?;

        let config_file = data_dir.join("zookeeper.properties");
        self.properties().write_to(&config_file).await?;

        let mut command = Command::new(script);
        command
            .arg(&config_file)
            .env("LOG_DIR", data_dir.join("logs"));

        match &self.spec.security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { credentials } => {
                let jaas_file = data_dir.join("zookeeper_jaas.conf");
                fs::write(&jaas_file, zookeeper_jaas(credentials)).await?;
                command.env(
                    "KAFKA_OPTS",
                    format!("-Djava.security.auth.login.config={}", jaas_file.display()),
                );
            }
        }
        Ok(command)
    }
}

#[async_trait]
impl ServiceHandle for ZookeeperService {
    fn id(&self) -> ServiceId {
        ServiceId::Zookeeper
    }

    fn address(&self) -> String {
        format!("{}:{}", self.backend.host, self.spec.port)
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
