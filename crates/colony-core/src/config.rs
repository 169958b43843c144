//! Configuration loading and typed config structures for the Colony
//! controller.
//!
//! The canonical configuration lives in `colony-config.yaml` at the project
//! root. Every section and field has a default, so an empty file (or no
//! file) yields a working controller.

use std::path::{Path, PathBuf};

use colony_agents::{AgentConfig, FsmConfig, RoleConfig};
use colony_types::Role;
use serde::{Deserialize, Serialize};

pub use crate::error::ConfigError;
use crate::population::PopulationConfig;

/// Environment variable that overrides `replay.snapshot_path`.
pub const SNAPSHOT_ENV: &str = "COLONY_SNAPSHOT";

/// Top-level controller configuration.
///
/// Mirrors the structure of `colony-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// State machine thresholds.
    #[serde(default)]
    pub fsm: FsmConfig,

    /// Role tuning.
    #[serde(default)]
    pub roles: RoleConfig,

    /// Population control.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Snapshot replay.
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-tick dispatch.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl ColonyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `COLONY_SNAPSHOT` overrides `replay.snapshot_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.replay.apply_env_overrides();
        Ok(config)
    }

    /// The thresholds the agents run with.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            fsm: self.fsm.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Snapshot replay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Run against a captured snapshot instead of the live host.
    #[serde(default)]
    pub enabled: bool,

    /// Snapshot file: raw JSON or a captured console line.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Ticks the offline debugger runs.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            snapshot_path: default_snapshot_path(),
            ticks: default_ticks(),
        }
    }
}

impl ReplayConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(SNAPSHOT_ENV)
            && !path.is_empty()
        {
            self.snapshot_path = PathBuf::from(path);
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("./debug_state.json")
}

const fn default_ticks() -> u64 {
    1
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Role given to creeps whose memory has none.
    #[serde(default = "default_role")]
    pub default_role: Role,

    /// Drop memory entries of creeps that no longer exist.
    #[serde(default = "default_true")]
    pub reap_memory: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            reap_memory: true,
        }
    }
}

const fn default_role() -> Role {
    Role::Harvester
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ColonyConfig::default();
        assert_eq!(config.fsm.max_hops, 4);
        assert_eq!(config.fsm.low_lifetime_threshold, 50);
        assert_eq!(config.roles.tower_reserve, 200);
        assert_eq!(config.population.spawn_name, "Spawn1");
        assert!(!config.replay.enabled);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.dispatcher.default_role, Role::Harvester);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
fsm:
  low_lifetime_threshold: 80
  renew_threshold: 1200
  renew_complete_threshold: 1300
  max_hops: 6

roles:
  tower_reserve: 300
  dropped_energy_min: 20
  container_energy_min: 150
  builder_source_min: 10

population:
  spawn_name: "Home"
  desired:
    harvester: 3
    attacker: 1
  priority: [attacker, harvester]
  fallback_energy: 250
  renew_roles: [carrier]

replay:
  enabled: true
  snapshot_path: "/tmp/capture.json"
  ticks: 20

logging:
  level: "debug"
  format: json

dispatcher:
  default_role: carrier
  reap_memory: false
"#;
        let config = ColonyConfig::parse(yaml).unwrap();
        assert_eq!(config.fsm.max_hops, 6);
        assert_eq!(config.fsm.renew_complete_threshold, 1300);
        assert_eq!(config.roles.container_energy_min, 150);
        assert_eq!(config.population.spawn_name, "Home");
        assert_eq!(config.population.desired.get(&Role::Harvester), Some(&3));
        assert_eq!(config.population.priority, vec![Role::Attacker, Role::Harvester]);
        assert_eq!(config.population.renew_roles, vec![Role::Carrier]);
        assert!(config.replay.enabled);
        assert_eq!(config.replay.ticks, 20);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.dispatcher.default_role, Role::Carrier);
        assert!(!config.dispatcher.reap_memory);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ColonyConfig::parse("fsm:\n  max_hops: 2\n").unwrap();
        assert_eq!(config.fsm.max_hops, 2);
        assert_eq!(config.fsm.renew_threshold, 1400);
        assert_eq!(config.population, PopulationConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        let config = ColonyConfig::parse("").unwrap();
        assert_eq!(config.fsm, FsmConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = ColonyConfig::parse("fsm: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn agent_config_carries_both_sections() {
        let config = ColonyConfig::parse("roles:\n  tower_reserve: 5\n").unwrap();
        let agents = config.agent_config();
        assert_eq!(agents.roles.tower_reserve, 5);
        assert_eq!(agents.fsm, config.fsm);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ColonyConfig::from_file(Path::new("/nonexistent/colony-config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
