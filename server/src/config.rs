use std::{env, path::Path};

use scoring::MatchConfig;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 1302;
pub const DEFAULT_CONFIG_PATH: &str = "server_config.json";
pub const CONFIG_PATH_VAR: &str = "PUCK_SERVER_CONFIG";
pub const PORT_VAR: &str = "PUCK_PORT";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(rename = "match")]
    pub match_rules: MatchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            match_rules: MatchConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<ServerConfig> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<ServerConfig>(&json)?;
        Ok(config)
    }

    /// Reads the file named by `PUCK_SERVER_CONFIG` (or the default path), then
    /// applies `PUCK_PORT` on top.
    pub fn from_env() -> ServerConfig {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        let mut config = match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("error while loading server config from {path}: {e}, using defaults");
                ServerConfig::default()
            }
        };

        if let Ok(port) = env::var(PORT_VAR) {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(e) => warn!("ignoring {PORT_VAR}={port}: {e}"),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_rules_nest_under_match() {
        let json = r#"{ "port": 4000, "match": { "goals_target": 7, "reset_position": { "x": 1.0, "y": 2.0, "z": 3.0 } } }"#;
        let config: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.match_rules.goals_target.get(), 7);
        assert_eq!(config.match_rules.reset_position.z, 3.0);
    }

    #[test]
    fn bare_match_config_is_rejected() {
        let err = serde_json::from_str::<ServerConfig>(r#"{ "goals_target": 3 }"#).unwrap_err();
        assert!(err.to_string().contains("goals_target"));
    }

    #[test]
    fn unknown_match_field_is_rejected() {
        assert!(serde_json::from_str::<ServerConfig>(r#"{ "match": { "goal_target": 3 } }"#).is_err());
    }

    #[test]
    fn empty_file_means_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }
}
