// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;

use crate::server::listener::parse_listen_addr;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    /// `host:port`; an empty host binds all interfaces, an empty or zero
    /// port requests an ephemeral port from the OS.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Size of the fixed read buffer each connection handler uses.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:0".to_string()
}

fn default_read_buffer_size() -> usize {
    1024
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            read_buffer_size: default_read_buffer_size(),
        }
    }
}

impl SinkConfig {
    pub fn validate(&self) -> Result<()> {
        parse_listen_addr(&self.listen_addr)?;
        if self.read_buffer_size == 0 {
            bail!("read_buffer_size must be nonzero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SinkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.read_buffer_size, 1024);
    }

    #[test]
    fn parses_yaml_with_partial_fields() {
        let config: SinkConfig = serde_yaml::from_str("listen_addr: \":0\"\n").unwrap();
        assert_eq!(config.listen_addr, ":0");
        assert_eq!(config.read_buffer_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_buffer() {
        let config = SinkConfig {
            read_buffer_size: 0,
            ..SinkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_listen_addr() {
        let config = SinkConfig {
            listen_addr: "no-port-here".to_string(),
            ..SinkConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
