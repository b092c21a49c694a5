//! Admin client driving the distribution's `kafka-topics.sh`

use std::path::PathBuf;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

use crate::admin::AdminClientConfig;
use crate::config::ProcessBackendConfig;
use crate::error::{EnvironmentError, EnvironmentResult};
use crate::traits::{AdminClient, AdminConnector, NewTopic};

/// Opens [`ScriptAdminClient`]s
#[derive(Debug, Clone)]
pub struct ScriptAdminConnector {
    backend: ProcessBackendConfig,
}

impl ScriptAdminConnector {
    pub fn new(backend: ProcessBackendConfig) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AdminConnector for ScriptAdminConnector {
    async fn connect(&self, config: AdminClientConfig) -> EnvironmentResult<Box<dyn AdminClient>> {
        let script = self.backend.topics_script();
        ProcessBackendConfig::require(&script)?;

        let config_file = tempfile::Builder::new()
            .prefix("embkafka-admin")
            .suffix(".properties")
            .tempfile()?;
        fs::write(config_file.path(), config.to_properties()).await?;

        Ok(Box::new(ScriptAdminClient {
            script,
            bootstrap_servers: config.bootstrap_servers().to_string(),
            config_file: Mutex::new(Some(config_file)),
        }))
    }
}

/// Admin client backed by `kafka-topics.sh` and a client properties file
///
/// The properties file lives until [`AdminClient::close`].
pub struct ScriptAdminClient {
    script: PathBuf,
    bootstrap_servers: String,
    config_file: Mutex<Option<NamedTempFile>>,
}

impl ScriptAdminClient {
    async fn run(&self, args: &[String]) -> EnvironmentResult<String> {
        let config_path = match self.config_file.lock().await.as_ref() {
            Some(file) => file.path().to_path_buf(),
            None => return Err(EnvironmentError::admin("client is closed")),
        };

        let output = Command::new(&self.script)
            .arg("--bootstrap-server")
            .arg(&self.bootstrap_servers)
            .arg("--command-config")
            .arg(&config_path)
            .args(args)
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(EnvironmentError::admin(format!(
                "kafka-topics {} failed: {}",
                args.first().map(String::as_str).unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Arguments of one `kafka-topics.sh --create` invocation
pub fn create_args(topic: &NewTopic) -> Vec<String> {
    vec![
        "--create".to_string(),
        "--if-not-exists".to_string(),
        "--topic".to_string(),
        topic.name.clone(),
        "--partitions".to_string(),
        topic.partitions.to_string(),
        "--replication-factor".to_string(),
        topic.replication_factor.to_string(),
    ]
}

#[async_trait]
impl AdminClient for ScriptAdminClient {
    async fn create_topics(&self, topics: Vec<NewTopic>) -> EnvironmentResult<()> {
        for topic in &topics {
            self.run(&create_args(topic))
                .await
                .map_err(|e| EnvironmentError::topics(format!("{}: {e}", topic.name)))?;
            debug!("📋 Created topic {}", topic.name);
        }
        Ok(())
    }

    async fn list_topics(&self) -> EnvironmentResult<Vec<String>> {
        let stdout = self.run(&["--list".to_string()]).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn close(&self) -> EnvironmentResult<()> {
        match self.config_file.lock().await.take() {
            Some(file) => file.close().map_err(EnvironmentError::from),
            None => Ok(()),
        }
    }
}
