use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the chatbot services.
///
/// Loaded from `ctop.toml` by default. Each section corresponds to one
/// process-level concern: the FAQ catalog, the action server and the
/// chat façade.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub actions: ActionServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed. Logs nothing,
    /// so it can run before a subscriber is installed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BotConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        Self::resolve(Self::load(path), path)
    }

    /// Log the outcome of an earlier [`BotConfig::load`] and fall back to
    /// defaults on error.
    pub fn resolve(loaded: Result<Self>, path: &Path) -> Self {
        match loaded {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// General process settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// FAQ catalog settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the YAML or JSON catalog resource.
    pub path: String,
    /// Number of recommendations returned when the caller does not ask
    /// for a specific count.
    pub default_top_k: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "data_for_recommendations.yml".to_string(),
            default_top_k: 3,
        }
    }
}

/// Action server (webhook) settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActionServerConfig {
    pub host: String,
    pub port: u16,
    /// Consecutive fallbacks after which the help menu is shown.
    pub fallback_threshold: u32,
    /// Longest recommendation button label, in characters.
    pub max_button_label: usize,
}

impl Default for ActionServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5055,
            fallback_threshold: 3,
            max_button_label: 35,
        }
    }
}

/// Chat façade settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub host: String,
    pub port: u16,
    /// Root URL of the dialogue agent server, for example
    /// `http://localhost:5005`. `None` leaves the façade running without an
    /// agent.
    pub agent_url: Option<String>,
    pub agent_timeout_secs: u64,
    /// Allowed CORS origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            agent_url: None,
            agent_timeout_secs: 30,
            allowed_origins: Vec::new(),
        }
    }
}
