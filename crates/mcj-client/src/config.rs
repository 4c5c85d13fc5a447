use serde::Deserialize;
use std::path::Path;

use mcj_proto::DecodeLimits;

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub server: ServerSection,
    pub account: AccountSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub registry: RegistrySection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Protocol id announced in the handshake, e.g. 340 for 1.12.2.
    pub protocol_version: i32,
}

fn default_port() -> u16 {
    25565
}

#[derive(Debug, Deserialize)]
pub struct AccountSection {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitsSection {
    #[serde(default = "default_max_string_len")]
    pub max_string_len: usize,
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,
}

fn default_max_string_len() -> usize {
    DecodeLimits::DEFAULT_MAX_STRING_LEN
}

fn default_max_array_len() -> usize {
    DecodeLimits::DEFAULT_MAX_ARRAY_LEN
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_string_len: default_max_string_len(),
            max_array_len: default_max_array_len(),
        }
    }
}

impl LimitsSection {
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_string_len: self.max_string_len,
            max_array_len: self.max_array_len,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrySection {
    #[serde(default = "default_registry_path")]
    pub path: String,
}

fn default_registry_path() -> String {
    "registry.json".into()
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [server]
            address = "127.0.0.1"
            port = 25566
            protocol_version = 340

            [account]
            username = "Steve"

            [limits]
            max_string_len = 1024

            [registry]
            path = "data/1.12.2.json"

            [logging]
            level = "debug"
        "#;
        let config = ClientConfig::parse(toml_str).unwrap();
        assert_eq!(config.server.port, 25566);
        assert_eq!(config.server.protocol_version, 340);
        assert_eq!(config.account.username, "Steve");
        assert_eq!(config.limits.max_string_len, 1024);
        assert_eq!(config.limits.max_array_len, DecodeLimits::DEFAULT_MAX_ARRAY_LEN);
        assert_eq!(config.registry.path, "data/1.12.2.json");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn optional_sections_default() {
        let toml_str = r#"
            [server]
            address = "localhost"
            protocol_version = 47

            [account]
            username = "Alex"

            [logging]
            level = "info"
        "#;
        let config = ClientConfig::parse(toml_str).unwrap();
        assert_eq!(config.server.port, 25565);
        assert_eq!(config.registry.path, "registry.json");
        assert_eq!(config.limits.decode_limits(), DecodeLimits::default());
    }

    #[test]
    fn missing_account_is_an_error() {
        let toml_str = r#"
            [server]
            address = "localhost"
            protocol_version = 47

            [logging]
            level = "info"
        "#;
        assert!(matches!(ClientConfig::parse(toml_str), Err(ClientError::Config(_))));
    }
}
