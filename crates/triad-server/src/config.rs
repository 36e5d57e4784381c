use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use triad_gate::AccessConfig;
use triad_store::ListLimits;

use crate::error::ServerResult;

/// Everything the server reads from its TOML file. Missing sections fall
/// back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub access: AccessConfig,
    pub sessions: SessionsConfig,
    pub listing: ListLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            access: AccessConfig::default(),
            sessions: SessionsConfig::default(),
            listing: ListLimits::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Bearer tokens accepted by the static session provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Token to user name.
    pub tokens: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.access, AccessConfig::default());
        assert!(c.sessions.tokens.is_empty());
        assert_eq!(c.listing.default_page_size, 20);
        assert_eq!(c.listing.max_page_size, 100);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:9000"

            [sessions.tokens]
            secret = "ada"

            [listing]
            max_page_size = 50
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.sessions.tokens["secret"], "ada");
        assert_eq!(c.listing.max_page_size, 50);
        assert_eq!(c.listing.default_page_size, 20);
        assert_eq!(c.access, AccessConfig::default());
    }

    #[test]
    fn access_table_overrides() {
        let c = ServerConfig::from_toml(
            r#"
            [access]
            restricted = ["/secrets"]
            "#,
        )
        .unwrap();
        assert_eq!(c.access.restricted, ["/secrets"]);
        assert!(c.access.read_only.is_empty());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"127.0.0.1:7000\"").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.bind_addr.port(), 7000);
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ServerConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ServerError::Io(_))));

        let invalid = ServerConfig::from_toml("bind_addr = 12");
        assert!(matches!(invalid, Err(ServerError::Config(_))));
    }

    #[test]
    fn toml_round_trip() {
        let mut c = ServerConfig::default();
        c.sessions.tokens.insert("t".into(), "ada".into());
        let text = c.to_toml().unwrap();
        assert_eq!(ServerConfig::from_toml(&text).unwrap(), c);
    }
}
