use crate::constants::*;
use crate::types::RecordType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub buffer_size: Option<usize>,
    pub record_type: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Resolver host or IP address
    pub server: String,
    /// Resolver port
    pub port: u16,
    /// Receive timeout in seconds
    pub timeout_secs: u64,
    /// UDP receive buffer size
    pub buffer_size: usize,
    /// Query type (A, AAAA, CNAME or a number)
    pub record_type: String,
    /// Log level
    pub log_level: String,
    /// Optional log file
    pub log_file: Option<String>,
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_DNS_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            record_type: "A".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }

    /// Load configuration from a configuration file
    pub fn load_from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file not found: {}",
                config_path.display()
            ));
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config_file: ConfigFile = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse {} as TOML", config_path.display()))?;

        let mut config = Self::new();
        config.apply_file(config_file);

        debug!("Configuration loaded from {}", config_path.display());
        Ok(config)
    }

    /// Try to load the configuration file from the default locations
    pub fn try_load_default() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::new())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./dnslookup.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dnslookup").join("dnslookup.toml"));
        }
        paths
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(server) = file.server {
            self.server = server;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(buffer_size) = file.buffer_size {
            self.buffer_size = buffer_size;
        }
        if let Some(record_type) = file.record_type {
            self.record_type = record_type;
        }
        if let Some(log_level) = file.log_level {
            self.log_level = log_level;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = Some(log_file);
        }
    }

    /// Save the configuration to a file
    pub fn save_to_file(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let config_path = config_path.as_ref();

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let config_file = ConfigFile {
            server: Some(self.server.clone()),
            port: Some(self.port),
            timeout_secs: Some(self.timeout_secs),
            buffer_size: Some(self.buffer_size),
            record_type: Some(self.record_type.clone()),
            log_level: Some(self.log_level.clone()),
            log_file: self.log_file.clone(),
        };

        let toml_content = toml::to_string_pretty(&config_file)
            .with_context(|| "Failed to serialize config to TOML")?;

        fs::write(config_path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        info!("Configuration saved to: {}", config_path.display());
        Ok(())
    }

    /// Parsed query type
    pub fn record_type(&self) -> Result<RecordType> {
        Ok(self.record_type.parse::<RecordType>()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(anyhow::anyhow!("Server address must not be empty"));
        }

        if !is_valid_port(self.port) {
            return Err(anyhow::anyhow!("Invalid port: {}", self.port));
        }

        if !is_valid_timeout(self.timeout_secs) {
            return Err(anyhow::anyhow!(
                "Invalid timeout: {}s (must be between 1 and {})",
                self.timeout_secs,
                MAX_TIMEOUT_SECS
            ));
        }

        if !is_valid_buffer_size(self.buffer_size) {
            return Err(anyhow::anyhow!(
                "Invalid buffer size: {} (must be between {} and {})",
                self.buffer_size,
                MIN_BUFFER_SIZE,
                MAX_BUFFER_SIZE
            ));
        }

        self.record_type()
            .with_context(|| format!("Invalid record type in configuration: {}", self.record_type))?;

        Ok(())
    }

    /// Log the effective configuration
    pub fn display(&self) {
        debug!("Configuration:");
        debug!("  Server: {}:{}", self.server, self.port);
        debug!("  Timeout: {}s", self.timeout_secs);
        debug!("  Buffer Size: {}", self.buffer_size);
        debug!("  Record Type: {}", self.record_type);
        debug!("  Log Level: {}", self.log_level);
        if let Some(ref log_file) = self.log_file {
            debug!("  Log File: {}", log_file);
        }
    }

    /// Apply command line overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(buffer_size) = cli.buffer_size {
            self.buffer_size = buffer_size;
        }
        if let Some(record_type) = &cli.record_type {
            self.record_type = record_type.clone();
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
    }
}

/// Command line overrides structure
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub buffer_size: Option<usize>,
    pub record_type: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
