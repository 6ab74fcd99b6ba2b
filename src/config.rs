use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::facade::FacadeConfig;
use crate::core::knowledge::LearnerConfig;
use crate::core::llm::RouterConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub router: RouterSettings,
    pub learner: LearnerConfig,
    pub generation: GenerationSettings,
    pub data: DataConfig,
}

/// Fallback-router tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Per-backend attempt timeout in milliseconds.
    pub attempt_timeout_ms: u64,
    /// Tokens assumed when a backend does not report usage.
    pub default_token_estimate: u32,
}

/// Facade-level generation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Variants aimed for per request.
    pub target_variants: usize,
    /// Successful backend outputs persisted back into the pool per request.
    pub persist_generated: usize,
    /// Score floor for counting a template as high-performing in reports.
    pub high_performer_threshold: f64,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 20_000,
            default_token_estimate: crate::core::llm::DEFAULT_TOKEN_ESTIMATE,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let facade = FacadeConfig::default();
        Self {
            target_variants: facade.target_variants,
            persist_generated: facade.persist_generated,
            high_performer_threshold: facade.high_performer_threshold,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/copymill/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Router configuration derived from the settings.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            attempt_timeout: Duration::from_millis(self.router.attempt_timeout_ms),
            default_token_estimate: self.router.default_token_estimate,
        }
    }

    /// Facade configuration derived from the settings.
    pub fn facade_config(&self) -> FacadeConfig {
        FacadeConfig {
            target_variants: self.generation.target_variants,
            persist_generated: self.generation.persist_generated,
            high_performer_threshold: self.generation.high_performer_threshold,
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("copymill"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("copymill").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
