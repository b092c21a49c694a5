//! Environment configuration
//!
//! [`EnvironmentConfig`] carries the construction parameters of one
//! environment; [`ProcessBackendConfig`] tells the process backend where the
//! Kafka and Schema Registry distributions live.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EnvironmentError, EnvironmentResult};

pub const KAFKA_HOME_VAR: &str = "KAFKA_HOME";
pub const SCHEMA_REGISTRY_HOME_VAR: &str = "SCHEMA_REGISTRY_HOME";

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    /// Requested broker count, resolved against topics and registry
    pub brokers: i32,
    /// Topics to create once the brokers are started
    pub topics: Vec<String>,
    pub with_schema_registry: bool,
    pub auto_start: bool,
    /// SASL/PLAIN authentication and ACL authorization on all listeners
    pub secure: bool,
    /// Parent of the coordinator and broker data directories
    pub data_root: PathBuf,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            brokers: 1,
            topics: Vec::new(),
            with_schema_registry: false,
            auto_start: false,
            secure: false,
            data_root: std::env::temp_dir(),
        }
    }
}

impl EnvironmentConfig {
    pub fn builder() -> EnvironmentConfigBuilder {
        EnvironmentConfigBuilder::new()
    }
}

pub struct EnvironmentConfigBuilder {
    config: EnvironmentConfig,
}

impl EnvironmentConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EnvironmentConfig::default(),
        }
    }

    /// Set the requested number of brokers
    pub fn brokers(mut self, count: i32) -> Self {
        self.config.brokers = count;
        self
    }

    /// Add one topic to create at startup
    pub fn topic<S: Into<String>>(mut self, topic: S) -> Self {
        self.config.topics.push(topic.into());
        self
    }

    /// Replace the topics to create at startup
    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schema_registry(mut self, enabled: bool) -> Self {
        self.config.with_schema_registry = enabled;
        self
    }

    pub fn auto_start(mut self, enabled: bool) -> Self {
        self.config.auto_start = enabled;
        self
    }

    pub fn secure(mut self, enabled: bool) -> Self {
        self.config.secure = enabled;
        self
    }

    pub fn data_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.data_root = root.into();
        self
    }

    pub fn build(self) -> EnvironmentConfig {
        self.config
    }
}

impl Default for EnvironmentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings of the process-backed services
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessBackendConfig {
    pub kafka_home: PathBuf,
    pub schema_registry_home: PathBuf,
    /// Host every listener binds to and advertises
    pub host: String,
    pub startup_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl ProcessBackendConfig {
    pub fn new<P: Into<PathBuf>>(kafka_home: P) -> Self {
        let kafka_home = kafka_home.into();
        Self {
            schema_registry_home: kafka_home.clone(),
            kafka_home,
            host: "localhost".to_string(),
            startup_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(10),
        }
    }

    /// Read distribution homes from `KAFKA_HOME` / `SCHEMA_REGISTRY_HOME`
    ///
    /// A `.env` file is loaded first when present.
    pub fn from_env() -> EnvironmentResult<Self> {
        let _ = dotenv::dotenv();

        let kafka_home = std::env::var(KAFKA_HOME_VAR).map_err(|_| EnvironmentError::Distribution {
            path: PathBuf::from(format!("${KAFKA_HOME_VAR}")),
        })?;

        let mut config = Self::new(kafka_home);
        if let Ok(home) = std::env::var(SCHEMA_REGISTRY_HOME_VAR) {
            config.schema_registry_home = PathBuf::from(home);
        }
        Ok(config)
    }

    pub fn with_schema_registry_home<P: Into<PathBuf>>(mut self, home: P) -> Self {
        self.schema_registry_home = home.into();
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn zookeeper_script(&self) -> PathBuf {
        self.kafka_home.join("bin").join("zookeeper-server-start.sh")
    }

    pub fn kafka_script(&self) -> PathBuf {
        self.kafka_home.join("bin").join("kafka-server-start.sh")
    }

    pub fn topics_script(&self) -> PathBuf {
        self.kafka_home.join("bin").join("kafka-topics.sh")
    }

    pub fn schema_registry_script(&self) -> PathBuf {
        self.schema_registry_home.join("bin").join("schema-registry-start")
    }

    /// Check that a script exists before anything is spawned from it
    pub fn require(script: &Path) -> EnvironmentResult<()> {
        if script.is_file() {
            Ok(())
        } else {
            Err(EnvironmentError::Distribution {
                path: script.to_path_buf(),
            })
        }
    }
}
