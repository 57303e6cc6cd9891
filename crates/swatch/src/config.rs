//! Configuration management for the Swatch CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (SWATCH_*)
//! 3. Config file (~/.config/swatch/config.toml)
//! 4. Default values

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Logical database name.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Secret used to sign tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,

    /// Dev server config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_config: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_database_name() -> String {
    "swatch".to_string()
}

fn default_database_url() -> String {
    "sqlite://swatch.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_host(),
            server_port: default_port(),
            database_name: default_database_name(),
            database_url: default_database_url(),
            jwt_secret: None,
            dev_config: None,
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("SWATCH_"));

        match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                Config::default()
            },
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Returns the path to the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swatch")
    }

    /// Saves the current configuration to the config file.
    pub fn save(&self) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(Self::config_dir())?;

        let toml_str = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(Self::config_path(), toml_str)?;
        Ok(())
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("Swatch Configuration");
    println!("====================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);
    println!("  database_name: {}", config.database_name);
    println!("  database_url: {}", config.database_url);
    println!(
        "  jwt_secret: {}",
        if config.jwt_secret.is_some() { "(set)" } else { "(not set)" }
    );
    println!(
        "  dev_config: {}",
        config
            .dev_config
            .as_ref()
            .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
    );

    println!("\nEnvironment variables:");
    println!("  SWATCH_SERVER_HOST");
    println!("  SWATCH_SERVER_PORT");
    println!("  SWATCH_DATABASE_NAME");
    println!("  SWATCH_DATABASE_URL");
    println!("  SWATCH_JWT_SECRET");
    println!("  SWATCH_DEV_CONFIG");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8787);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn test_toml_omits_unset_secret() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml_str.contains("server_port = 8787"));
        assert!(!toml_str.contains("jwt_secret"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string("server_port = 9000\njwt_secret = \"s3cret\"\n"))
            .extract()
            .unwrap();

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
    }
}
