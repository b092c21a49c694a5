//! Main entry point for the kafkaenv binary
//!
//! Runs an environment with the process backend until Ctrl+C, then tears it
//! down.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio::signal;
use tracing::{error, info};

use environment::{Collaborators, EnvironmentConfig, KafkaEnvironment, ProcessBackendConfig};

/// Embedded Kafka environment for local integration testing
#[derive(Parser)]
#[command(name = "kafkaenv")]
#[command(about = "Runs zookeeper, kafka brokers and an optional schema registry until Ctrl+C")]
pub struct Args {
    /// Requested broker count (resolved to 0..=2)
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub brokers: i32,

    /// Topic to create once the brokers are running (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Also run a schema registry
    #[arg(long)]
    pub schema_registry: bool,

    /// Enable SASL/PLAIN authentication and ACL authorization
    #[arg(long)]
    pub secure: bool,

    /// Kafka distribution directory (defaults to $KAFKA_HOME)
    #[arg(long)]
    pub kafka_home: Option<PathBuf>,

    /// Schema Registry distribution directory (defaults to $SCHEMA_REGISTRY_HOME, then the kafka home)
    #[arg(long)]
    pub schema_registry_home: Option<PathBuf>,

    /// Parent directory for the service data (defaults to the system temp dir)
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Seconds to wait for each service to become ready
    #[arg(long, default_value = "30")]
    pub startup_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print connection details as JSON
    #[arg(long)]
    pub json: bool,
}

/// What clients need to reach the running environment
#[derive(Debug, Serialize)]
struct ConnectionDetails {
    zookeeper: String,
    brokers: Option<String>,
    schema_registry: Option<String>,
    security_protocol: &'static str,
}

impl ConnectionDetails {
    fn of(environment: &KafkaEnvironment) -> Self {
        Self {
            zookeeper: environment.zookeeper().address(),
            brokers: environment.connection_string(),
            schema_registry: environment.schema_registry().map(|registry| registry.address()),
            security_protocol: environment.security().protocol(),
        }
    }

    fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            println!("zookeeper:        {}", self.zookeeper);
            println!("brokers:          {}", self.brokers.as_deref().unwrap_or("-"));
            println!("schema registry:  {}", self.schema_registry.as_deref().unwrap_or("-"));
            println!("security:         {}", self.security_protocol);
        }
        Ok(())
    }
}

fn backend_config(args: &Args) -> anyhow::Result<ProcessBackendConfig> {
    let mut backend = match &args.kafka_home {
        Some(home) => {
            let mut backend = ProcessBackendConfig::new(home);
            if let Ok(registry_home) = std::env::var(environment::config::SCHEMA_REGISTRY_HOME_VAR) {
                backend = backend.with_schema_registry_home(registry_home);
            }
            backend
        }
        None => ProcessBackendConfig::from_env().context("--kafka-home not given and KAFKA_HOME not set")?,
    };

    if let Some(home) = &args.schema_registry_home {
        backend = backend.with_schema_registry_home(home);
    }
    Ok(backend.with_startup_timeout(Duration::from_secs(args.startup_timeout_secs)))
}

fn environment_config(args: &Args) -> EnvironmentConfig {
    let mut builder = EnvironmentConfig::builder()
        .brokers(args.brokers)
        .topics(args.topics.iter().cloned())
        .with_schema_registry(args.schema_registry)
        .secure(args.secure);

    if let Some(root) = &args.data_root {
        builder = builder.data_root(root);
    }
    builder.build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    shared::logging::init_tracing(Some(&args.log_level));

    let backend = backend_config(&args)?;
    let config = environment_config(&args);
    info!("🚀 Starting kafkaenv from {}", backend.kafka_home.display());

    let mut environment = KafkaEnvironment::new(config, Collaborators::process(backend)).await?;

    if let Err(e) = environment.start().await {
        error!("❌ Environment failed to start: {}", e);
        environment.tear_down().await?;
        return Err(e.into());
    }

    ConnectionDetails::of(&environment).print(args.json)?;
    info!("✅ Environment running, press Ctrl+C to stop");

    if let Err(e) = signal::ctrl_c().await {
        error!("❌ Signal handling failed: {}", e);
    }

    info!("🛑 Shutting down");
    environment.tear_down().await?;
    Ok(())
}
