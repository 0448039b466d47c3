use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variables consulted for the upstream API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENWEATHER_API_KEY", "VITE_OPENWEATHER_API_KEY"];

pub const DEFAULT_POSTAL_COUNTRY: &str = "AU";

/// Cross-origin policy applied by the proxy server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CorsPolicy {
    /// `Access-Control-Allow-Origin: *`. Meant for local development.
    Any,
    /// Only the listed origins may call; other origins are rejected.
    AllowList { origins: Vec<String> },
}

impl Default for CorsPolicy {
    fn default() -> Self {
        CorsPolicy::AllowList {
            origins: vec![
                "http://localhost:5173".to_string(),
                "https://climatenow.vercel.app".to_string(),
            ],
        }
    }
}

/// What the server should do with a request from a given origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Serve it, echoing this value in `Access-Control-Allow-Origin`.
    Allow(String),
    /// Serve it without an allow-origin header (no `Origin` was sent).
    AllowWithoutHeader,
    Deny,
}

impl CorsPolicy {
    pub fn decide(&self, origin: Option<&str>) -> OriginDecision {
        match (self, origin) {
            (CorsPolicy::Any, _) => OriginDecision::Allow("*".to_string()),
            (CorsPolicy::AllowList { .. }, None) => OriginDecision::AllowWithoutHeader,
            (CorsPolicy::AllowList { origins }, Some(origin)) => {
                if origins.iter().any(|o| o == origin) {
                    OriginDecision::Allow(origin.to_string())
                } else {
                    OriginDecision::Deny
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cors: CorsPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:3000".to_string(), cors: CorsPolicy::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the proxy endpoints are served.
    pub base_url: String,
    /// Quiet period after the last keystroke before suggestions are fetched.
    pub debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:3000".to_string(), debounce_ms: 300 }
    }
}

impl ClientConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// postal_country = "AU"
///
/// [server]
/// bind_addr = "127.0.0.1:3000"
/// cors = { mode = "allow_list", origins = ["http://localhost:5173"] }
///
/// [client]
/// base_url = "http://127.0.0.1:3000"
/// debounce_ms = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream provider key. Environment variables take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Country context for postal-code lookups.
    pub postal_country: String,

    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            postal_country: DEFAULT_POSTAL_COUNTRY.to_string(),
            server: ServerConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform location, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override file values with the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override file values using `lookup` as the environment.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());

        if let Some(key) = from_env {
            self.api_key = Some(key);
        }
        self
    }

    /// Returns the API key, or an error telling the user how to provide one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: set {} or run `weather configure`.",
                API_KEY_ENV_VARS[0]
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.postal_country, "AU");
        assert_eq!(cfg.client.debounce(), Duration::from_millis(300));
        assert!(matches!(cfg.server.cors, CorsPolicy::AllowList { .. }));
    }

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn env_overrides_file_key() {
        let cfg = Config { api_key: Some("FILE".into()), ..Config::default() };

        let cfg = cfg.with_overrides_from(|name| match name {
            "OPENWEATHER_API_KEY" => Some("ENV".to_string()),
            _ => None,
        });
        assert_eq!(cfg.api_key().unwrap(), "ENV");
    }

    #[test]
    fn falls_back_to_secondary_env_var() {
        let cfg = Config::default().with_overrides_from(|name| match name {
            "OPENWEATHER_API_KEY" => Some("  ".to_string()),
            "VITE_OPENWEATHER_API_KEY" => Some("VITE".to_string()),
            _ => None,
        });
        assert_eq!(cfg.api_key().unwrap(), "VITE");
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "KEY"

            [server]
            cors = { mode = "any" }
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key().unwrap(), "KEY");
        assert_eq!(cfg.server.cors, CorsPolicy::Any);
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(cfg.postal_country, "AU");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.api_key = Some("KEY".into());
        cfg.postal_country = "NZ".into();
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn allow_list_decisions() {
        let policy = CorsPolicy::default();

        assert_eq!(
            policy.decide(Some("http://localhost:5173")),
            OriginDecision::Allow("http://localhost:5173".into())
        );
        assert_eq!(policy.decide(Some("https://evil.example")), OriginDecision::Deny);
        assert_eq!(policy.decide(None), OriginDecision::AllowWithoutHeader);
        assert_eq!(CorsPolicy::Any.decide(None), OriginDecision::Allow("*".into()));
    }
}
