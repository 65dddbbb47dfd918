//! CLI configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. YAML file (`--config`, else `~/.qbridge/config.yaml` when present)
//! 3. `QBRIDGE_*` environment variables
//!
//! ```yaml
//! shots: 2048
//! engines: [sim, stabilizer]
//! parallel: true
//! seed: 42
//! log_level: info
//! engine_settings:
//!   moment:
//!     max_qubits: 12
//!   exact:
//!     enabled: false
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use qbridge_exec::ExecutionMode;
use qbridge_hal::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::engines::ENGINE_IDS;

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Shots used when a command does not pass `--shots`.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Engines `compare` runs when `--engines` is omitted.
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,

    /// Run engines side by side in `compare` and `benchmark`.
    #[serde(default)]
    pub parallel: bool,

    /// Seed applied to every engine without its own.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Log level used when no `-v` flag is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-engine overrides keyed by engine id.
    #[serde(default)]
    pub engine_settings: BTreeMap<String, EngineSettings>,
}

/// Overrides for one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    /// Register the engine at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub seed: Option<u64>,

    /// Lower the engine's qubit ceiling.
    #[serde(default)]
    pub max_qubits: Option<usize>,

    /// Lower the engine's shot ceiling.
    #[serde(default)]
    pub max_shots: Option<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
            max_qubits: None,
            max_shots: None,
        }
    }
}

fn default_shots() -> u32 {
    1024
}

fn default_engines() -> Vec<String> {
    ENGINE_IDS.iter().map(|id| (*id).to_string()).collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            engines: default_engines(),
            parallel: false,
            seed: None,
            log_level: default_log_level(),
            engine_settings: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load a YAML file without environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load with full precedence: file, then environment, then validation.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QBRIDGE_*` overrides read through `lookup`.
    ///
    /// Only variables that are set override; a set but malformed variable is
    /// an error rather than silently ignored.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QBRIDGE_SHOTS") {
            self.shots = parse_env("QBRIDGE_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QBRIDGE_ENGINES") {
            self.engines = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = lookup("QBRIDGE_PARALLEL") {
            self.parallel = match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::Env { var: "QBRIDGE_PARALLEL", value: v }),
            };
        }
        if let Some(v) = lookup("QBRIDGE_SEED") {
            self.seed = Some(parse_env("QBRIDGE_SEED", &v)?);
        }
        if let Some(v) = lookup("QBRIDGE_LOG_LEVEL") {
            self.log_level = v.to_ascii_lowercase();
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Validation("shots must be greater than 0".to_string()));
        }

        if self.engines.is_empty() {
            return Err(ConfigError::Validation("engines must not be empty".to_string()));
        }
        for id in self.engines.iter().chain(self.engine_settings.keys()) {
            if !ENGINE_IDS.contains(&id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Unknown engine: '{id}'. Available: {}",
                    ENGINE_IDS.join(", ")
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::Validation(format!("Invalid log level: {other}")));
            }
        }

        for (id, settings) in &self.engine_settings {
            if settings.max_qubits == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "engine_settings.{id}.max_qubits must be greater than 0"
                )));
            }
            if settings.max_shots == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "engine_settings.{id}.max_shots must be greater than 0"
                )));
            }
        }

        Ok(())
    }

    /// Whether `engine` should be registered.
    pub fn is_enabled(&self, engine: &str) -> bool {
        self.engine_settings.get(engine).is_none_or(|s| s.enabled)
    }

    /// Construction settings for `engine`; its own seed wins over the global one.
    pub fn engine_config(&self, engine: &str) -> EngineConfig {
        let settings = self.engine_settings.get(engine).cloned().unwrap_or_default();
        EngineConfig {
            seed: settings.seed.or(self.seed),
            max_qubits: settings.max_qubits,
            max_shots: settings.max_shots,
        }
    }

    /// Scheduling mode for multi-engine commands.
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// `~/.qbridge/config.yaml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qbridge").join("config.yaml"))
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}
