//! CLI argument definitions for the ctOP chatbot.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// ctOP chatbot: action server and chat API for the ctOP dashboard assistant.
#[derive(Parser, Debug)]
#[command(name = "ctop-chatbot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// FAQ catalog file (YAML or JSON).
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,

    /// Action server port.
    #[arg(long = "action-port")]
    pub action_port: Option<u16>,

    /// Chat API port.
    #[arg(long = "chat-port")]
    pub chat_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Priority: --config flag > CTOP_CONFIG env var > ./ctop.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CTOP_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("ctop.toml")
    }

    /// Priority: --catalog flag > CTOP_CATALOG env var > config file value.
    pub fn resolve_catalog_path(&self, config_path: &str) -> PathBuf {
        if let Some(ref p) = self.catalog {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CTOP_CATALOG") {
            return PathBuf::from(p);
        }
        PathBuf::from(config_path)
    }

    /// Priority: --action-port flag > CTOP_ACTION_PORT env var > config file value.
    pub fn resolve_action_port(&self, config_port: u16) -> u16 {
        resolve_port(self.action_port, "CTOP_ACTION_PORT", config_port)
    }

    /// Priority: --chat-port flag > CTOP_CHAT_PORT env var > config file value.
    pub fn resolve_chat_port(&self, config_port: u16) -> u16 {
        resolve_port(self.chat_port, "CTOP_CHAT_PORT", config_port)
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn resolve_port(flag: Option<u16>, env_var: &str, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Ok(val) = std::env::var(env_var) {
        if let Ok(p) = val.parse::<u16>() {
            return p;
        }
    }
    config_port
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_take_priority() {
        let args = CliArgs::try_parse_from([
            "ctop-chatbot",
            "--config",
            "/etc/ctop.toml",
            "--catalog",
            "faqs.json",
            "--action-port",
            "6000",
            "--chat-port",
            "6001",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/ctop.toml"));
        assert_eq!(
            args.resolve_catalog_path("data_for_recommendations.yml"),
            PathBuf::from("faqs.json")
        );
        assert_eq!(args.resolve_action_port(5055), 6000);
        assert_eq!(args.resolve_chat_port(8000), 6001);
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::try_parse_from(["ctop-chatbot"]).unwrap();
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(CliArgs::try_parse_from(["ctop-chatbot", "--chat-port", "99999"]).is_err());
    }
}
