//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::backend::SupabaseConfig as SupabaseClientConfig;
use crate::ui::DEFAULT_TIMESTAMP_FORMAT;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub supabase: SupabaseConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Views untouched for this long are dropped
    #[serde(default = "default_view_idle_timeout")]
    pub view_idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Upper bound on live views
    #[serde(default = "default_max_views")]
    pub max_views: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_view_idle_timeout() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_max_views() -> usize {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            view_idle_timeout_secs: default_view_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            max_views: default_max_views(),
        }
    }
}

/// Hosted backend (Supabase project) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default = "default_supabase_url")]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_supabase_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_table() -> String {
    "handshakes".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: default_supabase_url(),
            anon_key: String::new(),
            table: default_table(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl SupabaseConfig {
    /// Settings for the REST client
    pub fn client_config(&self) -> SupabaseClientConfig {
        SupabaseClientConfig {
            url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            table: self.table.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Page rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// chrono strftime layout for handshake timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("absolute-handshake").join("config.toml")),
            Some(PathBuf::from("/etc/absolute-handshake/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("HANDSHAKE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("HANDSHAKE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Backend overrides
        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = var("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = key;
        }
        if let Some(table) = var("HANDSHAKE_TABLE") {
            self.supabase.table = table;
        }

        // Logging overrides
        if let Some(level) = var("HANDSHAKE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HANDSHAKE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Absolute Handshake Configuration
#
# Environment variables override these settings:
# - HANDSHAKE_HOST
# - HANDSHAKE_PORT
# - SUPABASE_URL
# - SUPABASE_ANON_KEY
# - HANDSHAKE_TABLE
# - HANDSHAKE_LOG_LEVEL
# - HANDSHAKE_LOG_FORMAT

[server]
# Address to serve the page on
host = "0.0.0.0"
port = 3000

# Drop browser views idle for this long (seconds)
view_idle_timeout_secs = 3600

# How often to look for idle views (seconds)
sweep_interval_secs = 300

# Most browser views kept at once; the least recently used one makes room
max_views = 10000

[supabase]
# Project URL and public anon key
url = "http://localhost:54321"
anon_key = ""

# Table with columns id, user_id, message, created_at
table = "handshakes"

# Request timeout in milliseconds
request_timeout_ms = 10000

[view]
# chrono strftime layout for handshake timestamps (server local time)
timestamp_format = "%-m/%-d/%Y, %-I:%M:%S %p"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_views, 10_000);
        assert_eq!(config.supabase.table, "handshakes");
        assert_eq!(config.view.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.supabase.request_timeout_ms, 10_000);
        assert_eq!(config.view.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[supabase]\nurl = \"https://demo.supabase.co\"\nanon_key = \"anon\"\n\n[server]\nport = 8080"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.supabase.url, "https://demo.supabase.co");
        assert_eq!(config.supabase.table, "handshakes");

        let client = config.supabase.client_config();
        assert_eq!(client.anon_key, "anon");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HANDSHAKE_PORT", "9000"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "key"),
            ("HANDSHAKE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.supabase.url, "https://x.supabase.co");
        assert_eq!(config.supabase.anon_key, "key");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "HANDSHAKE_PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 3000);
    }
}
