//! Security credential bootstrap
//!
//! Credentials are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! and fall back to fixed test credentials when neither sets them. The JAAS
//! login files the services need in security mode are rendered here too.

use shared::Credentials;

use crate::error::{EnvironmentError, EnvironmentResult};
use crate::traits::CredentialSource;

pub const USERNAME_VAR: &str = "KAFKAENV_USERNAME";
pub const PASSWORD_VAR: &str = "KAFKAENV_PASSWORD";

pub const DEFAULT_USERNAME: &str = "srvkafkaclient";
pub const DEFAULT_PASSWORD: &str = "kafkaclient";

/// Credential source reading `KAFKAENV_USERNAME` / `KAFKAENV_PASSWORD`
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialSource;

impl EnvCredentialSource {
    pub fn new() -> Self {
        Self
    }

    fn init_env() {
        // A missing .env file is fine
        let _ = dotenv::dotenv();
    }
}

impl CredentialSource for EnvCredentialSource {
    fn bootstrap(&self) -> EnvironmentResult<Credentials> {
        Self::init_env();

        let username = std::env::var(USERNAME_VAR).unwrap_or_else(|_| DEFAULT_USERNAME.to_string());
        let password = std::env::var(PASSWORD_VAR).unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

        validate(Credentials::new(username, password))
    }
}

/// Credential source handing out fixed credentials
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    credentials: Credentials,
}

impl StaticCredentialSource {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialSource for StaticCredentialSource {
    fn bootstrap(&self) -> EnvironmentResult<Credentials> {
        validate(self.credentials.clone())
    }
}

// Credentials end up inside quoted JAAS strings.
fn validate(credentials: Credentials) -> EnvironmentResult<Credentials> {
    if credentials.username.is_empty() {
        return Err(EnvironmentError::credentials("username is empty"));
    }
    if credentials.username.contains('"') || credentials.password.contains('"') {
        return Err(EnvironmentError::credentials("credentials must not contain '\"'"));
    }
    Ok(credentials)
}

/// JAAS file for zookeeper: accepts the bootstrap user over SASL/DIGEST
pub fn zookeeper_jaas(credentials: &Credentials) -> String {
    format!(
        "Server {{\n    org.apache.zookeeper.server.auth.DigestLoginModule required\n    user_{user}=\"{password}\";\n}};\n",
        user = credentials.username,
        password = credentials.password,
    )
}

/// JAAS file for a broker: SASL/PLAIN server plus its zookeeper client login
pub fn broker_jaas(credentials: &Credentials) -> String {
    format!(
        "KafkaServer {{\n    org.apache.kafka.common.security.plain.PlainLoginModule required\n    username=\"{user}\"\n    password=\"{password}\"\n    user_{user}=\"{password}\";\n}};\n\
         Client {{\n    org.apache.zookeeper.server.auth.DigestLoginModule required\n    username=\"{user}\"\n    password=\"{password}\";\n}};\n",
        user = credentials.username,
        password = credentials.password,
    )
}

/// Inline `sasl.jaas.config` value for a SASL/PLAIN client
pub fn plain_client_jaas(credentials: &Credentials) -> String {
    format!(
        "org.apache.kafka.common.security.plain.PlainLoginModule required username=\"{}\" password=\"{}\";",
        credentials.username, credentials.password
    )
}
