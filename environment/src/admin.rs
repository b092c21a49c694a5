//! Admin client construction, gated on the environment state

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::SecurityMode;

use crate::error::EnvironmentResult;
use crate::park::{BrokerTopologyStatus, LifecycleState, ServerPark};
use crate::services::credentials::plain_client_jaas;
use crate::services::properties::Properties;
use crate::traits::{AdminClient, AdminConnector};

pub const ADMIN_CLIENT_ID: &str = "embkafka-adminclient";

pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";
pub const CLIENT_ID: &str = "client.id";
pub const SECURITY_PROTOCOL: &str = "security.protocol";
pub const SASL_MECHANISM: &str = "sasl.mechanism";
pub const SASL_JAAS_CONFIG: &str = "sasl.jaas.config";

/// Client-side properties of an admin connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClientConfig {
    properties: BTreeMap<String, String>,
}

impl AdminClientConfig {
    pub fn new(connection_string: &str, security: &SecurityMode) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(BOOTSTRAP_SERVERS.to_string(), connection_string.to_string());
        properties.insert(CLIENT_ID.to_string(), ADMIN_CLIENT_ID.to_string());

        match security {
            SecurityMode::Plaintext => {}
            SecurityMode::SaslPlain { credentials } => {
                properties.insert(SECURITY_PROTOCOL.to_string(), security.protocol().to_string());
                properties.insert(SASL_MECHANISM.to_string(), "PLAIN".to_string());
                properties.insert(SASL_JAAS_CONFIG.to_string(), plain_client_jaas(credentials));
            }
        }

        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn bootstrap_servers(&self) -> &str {
        self.get(BOOTSTRAP_SERVERS).unwrap_or_default()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Render as a Java properties file
    pub fn to_properties(&self) -> String {
        let mut rendered = Properties::new();
        for (key, value) in &self.properties {
            rendered.set(key.as_str(), value);
        }
        rendered.render()
    }
}

/// Builds admin clients for a broker topology
#[derive(Clone)]
pub struct AdminClientFactory {
    connector: Arc<dyn AdminConnector>,
    security: SecurityMode,
}

impl AdminClientFactory {
    pub fn new(connector: Arc<dyn AdminConnector>, security: SecurityMode) -> Self {
        Self {
            connector,
            security,
        }
    }

    pub fn security(&self) -> &SecurityMode {
        &self.security
    }

    /// Open an admin client, or `None` unless brokers are available and started
    ///
    /// The caller owns the client and must `close` it.
    pub async fn create(&self, park: &ServerPark) -> EnvironmentResult<Option<Box<dyn AdminClient>>> {
        let connection_string = match (&park.broker_status, park.state) {
            (
                BrokerTopologyStatus::Available {
                    connection_string, ..
                },
                LifecycleState::Started,
            ) => connection_string,
            (BrokerTopologyStatus::Available { .. }, LifecycleState::Initialized)
            | (BrokerTopologyStatus::Available { .. }, LifecycleState::Stopped)
            | (BrokerTopologyStatus::Available { .. }, LifecycleState::TornDown)
            | (BrokerTopologyStatus::NotAvailable, _) => return Ok(None),
        };

        let config = AdminClientConfig::new(connection_string, &self.security);
        let client = self.connector.connect(config).await?;
        Ok(Some(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Credentials;

    #[test]
    fn test_plaintext_config() {
        let config = AdminClientConfig::new("localhost:9092,localhost:9093", &SecurityMode::Plaintext);

        assert_eq!(config.bootstrap_servers(), "localhost:9092,localhost:9093");
        assert_eq!(config.get(CLIENT_ID), Some(ADMIN_CLIENT_ID));
        assert!(config.get(SECURITY_PROTOCOL).is_none());
        assert!(config.get(SASL_JAAS_CONFIG).is_none());
    }

    #[test]
    fn test_sasl_plain_config() {
        let security = SecurityMode::SaslPlain {
            credentials: Credentials::new("srvkafkaclient", "kafkaclient"),
        };
        let config = AdminClientConfig::new("localhost:9092", &security);

        assert_eq!(config.get(SECURITY_PROTOCOL), Some("SASL_PLAINTEXT"));
        assert_eq!(config.get(SASL_MECHANISM), Some("PLAIN"));
        let jaas = config.get(SASL_JAAS_CONFIG).unwrap();
        assert!(jaas.starts_with("org.apache.kafka.common.security.plain.PlainLoginModule required"));
        assert!(jaas.contains("username=\"srvkafkaclient\""));
        assert!(jaas.contains("password=\"kafkaclient\";"));
    }

    #[test]
    fn test_properties_rendering() {
        let config = AdminClientConfig::new("localhost:9092", &SecurityMode::Plaintext);
        let rendered = config.to_properties();

        assert!(rendered.contains("bootstrap.servers=localhost:9092\n"));
        assert!(rendered.contains("client.id=embkafka-adminclient\n"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_rendering_escapes_like_service_files() {
        let credentials = Credentials::new("srvkafkaclient", "p\\w");
        let security = SecurityMode::SaslPlain {
            credentials: credentials.clone(),
        };
        let rendered = AdminClientConfig::new("localhost:9092", &security).to_properties();

        let mut service_file = Properties::new();
        service_file.set(SASL_JAAS_CONFIG, plain_client_jaas(&credentials));
        let service_line = service_file.render();

        assert!(rendered.contains(r#"password="p\\w";"#));
        assert!(rendered.contains(service_line.as_str()));
    }
}
