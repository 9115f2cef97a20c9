//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`CSI_*`)
//! - CLI arguments (flags override both)
//!
//! Provider credentials are deliberately not part of [`Config`]: they
//! are read straight from the environment and checked all at once by
//! [`validate_credentials`] before the dashboard starts serving.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CsiError, Result};
use crate::personas::Provider;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dashboard server configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Simulation defaults
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Agent call configuration
    #[serde(default)]
    pub agents: AgentConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CsiError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| CsiError::Config(format!("Failed to parse config: {e}")))
    }

    /// Default config file location (`<config dir>/csi/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("csi").join("config.toml"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Dashboard settings
        if let Ok(host) = std::env::var("CSI_DASHBOARD_HOST") {
            config.dashboard.host = host;
        }
        if let Ok(port) = std::env::var("CSI_DASHBOARD_PORT") {
            if let Ok(port) = port.parse() {
                config.dashboard.port = port;
            }
        }

        // Simulation settings
        if let Ok(topic) = std::env::var("CSI_DEFAULT_TOPIC") {
            config.simulation.default_topic = topic;
        }
        if let Ok(val) = std::env::var("CSI_DEFAULT_PARTICIPANTS") {
            if let Ok(val) = val.parse() {
                config.simulation.default_participants = val;
            }
        }
        if let Ok(seed) = std::env::var("CSI_SEED") {
            if let Ok(seed) = seed.parse() {
                config.simulation.seed = Some(seed);
            }
        }

        // Agent settings
        if let Ok(val) = std::env::var("CSI_AGENT_TIMEOUT_SECS") {
            if let Ok(val) = val.parse() {
                config.agents.request_timeout_secs = val;
            }
        }

        config
    }

    /// Merge with another config (other takes precedence)
    pub fn merge(self, other: Self) -> Self {
        let dashboard_defaults = DashboardConfig::default();
        let simulation_defaults = SimulationConfig::default();
        let agent_defaults = AgentConfig::default();

        Self {
            dashboard: DashboardConfig {
                host: if other.dashboard.host != dashboard_defaults.host {
                    other.dashboard.host
                } else {
                    self.dashboard.host
                },
                port: if other.dashboard.port != dashboard_defaults.port {
                    other.dashboard.port
                } else {
                    self.dashboard.port
                },
            },
            simulation: SimulationConfig {
                default_topic: if other.simulation.default_topic != simulation_defaults.default_topic
                {
                    other.simulation.default_topic
                } else {
                    self.simulation.default_topic
                },
                default_participants: if other.simulation.default_participants
                    != simulation_defaults.default_participants
                {
                    other.simulation.default_participants
                } else {
                    self.simulation.default_participants
                },
                seed: other.simulation.seed.or(self.simulation.seed),
            },
            agents: AgentConfig {
                request_timeout_secs: if other.agents.request_timeout_secs
                    != agent_defaults.request_timeout_secs
                {
                    other.agents.request_timeout_secs
                } else {
                    self.agents.request_timeout_secs
                },
            },
        }
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl DashboardConfig {
    /// Get the full listen address
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Simulation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Topic used when none is supplied
    pub default_topic: String,

    /// Participant count used when none is supplied
    pub default_participants: u32,

    /// Fixed seed for reproducible sessions (unseeded when absent)
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_topic: "How can we make cities more sustainable?".to_string(),
            default_participants: 75,
            seed: None,
        }
    }
}

/// Agent call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// The credential environment variables required at startup, one per provider.
pub fn required_credentials() -> Vec<&'static str> {
    Provider::all().iter().map(Provider::credential_var).collect()
}

/// Check that every provider credential is present and non-empty.
///
/// All missing names are collected into a single fatal error so the
/// operator fixes the environment in one pass.
pub fn validate_credentials() -> Result<()> {
    let missing: Vec<&str> = required_credentials()
        .into_iter()
        .filter(|var| !std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CsiError::Config(format!(
            "Missing required environment variables: {}\nPlease add them to your .env file.",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dashboard.port, 8501);
        assert_eq!(config.dashboard.host, "127.0.0.1");
        assert_eq!(config.simulation.default_participants, 75);
        assert_eq!(
            config.simulation.default_topic,
            "How can we make cities more sustainable?"
        );
        assert_eq!(config.agents.request_timeout_secs, 30);
        assert!(config.simulation.seed.is_none());
    }

    #[test]
    fn test_dashboard_listen_addr() {
        let config = DashboardConfig::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:8501");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [dashboard]
            host = "0.0.0.0"
            port = 9090

            [simulation]
            default_topic = "Remote work"
            default_participants = 30
            seed = 7

            [agents]
            request_timeout_secs = 10
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.dashboard.host, "0.0.0.0");
        assert_eq!(config.dashboard.port, 9090);
        assert_eq!(config.simulation.default_topic, "Remote work");
        assert_eq!(config.simulation.default_participants, 30);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.agents.request_timeout_secs, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [dashboard]
            port = 3000
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.dashboard.port, 3000);
        assert_eq!(config.dashboard.host, "127.0.0.1");
        assert_eq!(config.simulation.default_participants, 75);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\ndefault_participants = 45").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.simulation.default_participants, 45);

        let err = Config::from_file("/nonexistent/csi.toml").unwrap_err();
        assert!(matches!(err, CsiError::Config(_)));
    }

    #[test]
    fn test_merge_prefers_non_default_values() {
        let base = Config {
            dashboard: DashboardConfig {
                host: "0.0.0.0".to_string(),
                port: 8501,
            },
            simulation: SimulationConfig {
                seed: Some(1),
                ..SimulationConfig::default()
            },
            agents: AgentConfig::default(),
        };
        let overlay = Config {
            dashboard: DashboardConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
            },
            simulation: SimulationConfig::default(),
            agents: AgentConfig {
                request_timeout_secs: 5,
            },
        };

        let merged = base.merge(overlay);
        // Overlay port and timeout win; overlay host is the default, so
        // the base value survives; the base seed survives.
        assert_eq!(merged.dashboard.port, 4000);
        assert_eq!(merged.dashboard.host, "0.0.0.0");
        assert_eq!(merged.agents.request_timeout_secs, 5);
        assert_eq!(merged.simulation.seed, Some(1));
    }

    #[test]
    fn test_required_credentials_order() {
        assert_eq!(
            required_credentials(),
            [
                "OPENAI_API_KEY",
                "ANTHROPIC_API_KEY",
                "MISTRAL_API_KEY",
                "GROQ_API_KEY",
                "GEMINI_API_KEY",
                "COHERE_API_KEY",
                "EMERGENCE_API_KEY"
            ]
        );
    }

    #[test]
    fn test_validate_credentials_enumerates_missing() {
        for var in required_credentials() {
            std::env::set_var(var, "test-key");
        }
        assert!(validate_credentials().is_ok());

        std::env::remove_var("GROQ_API_KEY");
        std::env::set_var("COHERE_API_KEY", "");
        let err = validate_credentials().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GROQ_API_KEY"));
        assert!(message.contains("COHERE_API_KEY"));
        assert!(!message.contains("OPENAI_API_KEY"));

        for var in required_credentials() {
            std::env::remove_var(var);
        }
    }
}
