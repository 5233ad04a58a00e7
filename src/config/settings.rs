use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shell: ShellConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShellConfig {
    /// Shell binary; falls back to $SHELL, then /bin/sh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Run as a login shell so user profiles and aliases load
    pub login_shell: bool,
    /// Toolchain directories prepended to PATH for spawned commands
    pub path_prefix: Vec<String>,
    /// Per-stream capture limit; exceeding it fails the execution
    pub max_output_bytes: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BehaviorConfig {
    pub log_commands: bool,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME")
            .map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("shellpad"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Err(ConfigError::ReadError(
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Config file not found"
                )
            ));
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;

        // Validate config
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load(),
            _ => Ok(Self::default_config()),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        // Validate before saving
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)?;

        fs::write(&path, contents)?;

        Ok(())
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            shell: ShellConfig {
                program: None,
                login_shell: true,
                path_prefix: vec![
                    "~/.cargo/bin".to_string(),
                    "~/.local/bin".to_string(),
                    "/usr/local/bin".to_string(),
                ],
                max_output_bytes: 10 * 1024 * 1024,
            },
            behavior: BehaviorConfig {
                log_commands: true,
            },
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "server.host must not be empty".to_string()
            ));
        }

        if let Some(program) = &self.shell.program {
            if program.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "shell.program must not be empty when set".to_string()
                ));
            }
        }

        if self.shell.max_output_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "shell.max_output_bytes must be greater than 0".to_string()
            ));
        }

        if self.shell.path_prefix.iter().any(|entry| entry.is_empty()) {
            return Err(ConfigError::InvalidValue(
                "shell.path_prefix entries must not be empty".to_string()
            ));
        }

        Ok(())
    }
}

impl ShellConfig {
    /// Resolve the shell binary to invoke
    pub fn resolve_program(&self) -> PathBuf {
        if let Some(program) = &self.program {
            return PathBuf::from(program);
        }

        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}
