//! Process-backed Kafka broker

use async_trait::async_trait;
use shared::{SecurityMode, ServiceId};
use tokio::fs;
use tokio::process::Command;

use crate::config::ProcessBackendConfig;
use crate::error::EnvironmentResult;
use crate::services::credentials::broker_jaas;
use crate::services::process::{ManagedProcess, ReadinessProbe};
use crate::services::properties::Properties;
use crate::traits::{BrokerSpec, ServiceHandle};

pub struct BrokerService {
    spec: BrokerSpec,
    backend: ProcessBackendConfig,
    process: ManagedProcess,
}

impl BrokerService {
    pub fn new(spec: BrokerSpec, backend: ProcessBackendConfig) -> Self {
        let process = ManagedProcess::new(
            ServiceId::Broker(spec.id),
            ReadinessProbe::Tcp(format!("{}:{}", backend.host, spec.port)),
            backend.startup_timeout,
            backend.shutdown_grace,
        );
        Self { spec, backend, process }
    }

    pub fn properties(&self) -> Properties {
        let spec = &self.spec;
        let listener = format!("{}://{}:{}", spec.security.protocol(), self.backend.host, spec.port);

        let mut properties = Properties::new();
        properties
            .set("broker.id", spec.id)
            .set("listeners", &listener)
            .set("advertised.listeners", &listener)
            .set("log.dirs", spec.data_dir.join("logs").display())
            .set("zookeeper.connect", &spec.coordinator_address)
            .set("zookeeper.connection.timeout.ms", 6000)
            .set("num.partitions", 1)
            .set("default.replication.factor", spec.peer_count)
            .set("offsets.topic.replication.factor", spec.peer_count)
            .set("transaction.state.log.replication.factor", spec.peer_count)
            .set("transaction.state.log.min.isr", 1)
            .set("group.initial.rebalance.delay.ms", 0)
            .set("auto.create.topics.enable", true);

        match &spec.security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { credentials } => {
                properties
                    .set("security.inter.broker.protocol", spec.security.protocol())
                    .set("sasl.mechanism.inter.broker.protocol", "PLAIN")
                    .set("sasl.enabled.mechanisms", "PLAIN")
                    .set("authorizer.class.name", "kafka.security.authorizer.AclAuthorizer")
                    .set("super.users", format!("User:{}", credentials.username))
                    .set("zookeeper.set.acl", false);
            }
        }
        properties
    }

    async fn command(&self) -> EnvironmentResult<Command> {
        let script = self.backend.kafka_script();
        ProcessBackendConfig::require(&script)?;

        let data_dir = &self.spec.data_dir;
        fs::create_dir_all(data_dir.join("logs")).await?;

        let config_file = data_dir.join("server.properties");
        self.properties().write_to(&config_file).await?;

        let mut command = Command::new(script);
        command
            .arg(&config_file)
            .env("LOG_DIR", data_dir.join("server-logs"));

        match &self.spec.security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { credentials } => {
                let jaas_file = data_dir.join("kafka_server_jaas.conf");
                fs::write(&jaas_file, broker_jaas(credentials)).await?;
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
impl ServiceHandle for BrokerService {
    fn id(&self) -> ServiceId {
        ServiceId::Broker(self.spec.id)
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
