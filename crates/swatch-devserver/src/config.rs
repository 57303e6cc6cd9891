//! Development server configuration.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Environment variables (`SWATCH_DEV_*`, nested keys split on `__`)
//! 2. Config file (`swatch.dev.toml` by default)
//! 3. Default values

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use swatch_core::{Error, Result};

use crate::proxy::ProxyRule;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "swatch.dev.toml";

/// Frontend build and dev-server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    /// UI framework integration plugins.
    #[serde(default = "default_plugins")]
    pub plugins: Vec<String>,

    /// Import path aliases, symbol to directory.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Project root served as static files.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Dev server settings.
    #[serde(default)]
    pub server: DevServerConfig,
}

/// Dev server listener and proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Reverse-proxy rules, checked in order.
    #[serde(default = "default_proxy")]
    pub proxy: Vec<ProxyRule>,
}

fn default_plugins() -> Vec<String> {
    vec!["react".to_string()]
}

fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("@".to_string(), "./src".to_string())])
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_proxy() -> Vec<ProxyRule> {
    vec![ProxyRule::new("/api", "http://127.0.0.1:8787")]
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            plugins: default_plugins(),
            aliases: default_aliases(),
            root: default_root(),
            server: DevServerConfig::default(),
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            proxy: default_proxy(),
        }
    }
}

impl DevConfig {
    /// Loads configuration from defaults, the given file (or
    /// [`DEFAULT_CONFIG_FILE`]) and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("SWATCH_DEV_").split("__")),
        )
    }

    /// Parses configuration from a TOML string layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or the result is invalid.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::string(toml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks aliases and proxy rules.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid entry.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::invalid_config("server.port must be non-zero"));
        }
        if let Some(alias) = self.aliases.keys().find(|a| a.is_empty()) {
            return Err(Error::invalid_config(format!(
                "alias {alias:?} must not be empty"
            )));
        }
        for rule in &self.server.proxy {
            rule.validate()?;
        }
        Ok(())
    }

    /// Rewrites an aliased import path to the directory it points at.
    ///
    /// An alias matches the whole path or a leading segment (`@` matches `@`
    /// and `@/x`, never `@x`). The longest matching alias wins. Paths with no
    /// matching alias come back unchanged.
    #[must_use]
    pub fn resolve_alias(&self, path: &str) -> String {
        let matched = self
            .aliases
            .iter()
            .filter(|(alias, _)| {
                path == alias.as_str()
                    || path
                        .strip_prefix(alias.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|(alias, _)| alias.len());

        match matched {
            Some((alias, target)) => format!("{}{}", target, &path[alias.len()..]),
            None => path.to_string(),
        }
    }

    /// Returns the first proxy rule matching `path`.
    #[must_use]
    pub fn proxy_for(&self, path: &str) -> Option<&ProxyRule> {
        self.server.proxy.iter().find(|rule| rule.matches(path))
    }

    /// Returns the `host:port` the dev server listens on.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = DevConfig::default();

        assert_eq!(config.plugins, vec!["react"]);
        assert_eq!(config.aliases.get("@").map(String::as_str), Some("./src"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.listen_addr(), "127.0.0.1:3000");

        let rule = config.proxy_for("/api/groups").unwrap();
        assert_eq!(rule.target, "http://127.0.0.1:8787");
        assert!(rule.change_origin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_alias() {
        let config = DevConfig::default();

        assert_eq!(config.resolve_alias("@/components/Button"), "./src/components/Button");
        assert_eq!(config.resolve_alias("@"), "./src");
        assert_eq!(config.resolve_alias("@scope/pkg"), "@scope/pkg");
        assert_eq!(config.resolve_alias("react"), "react");
    }

    #[test]
    fn test_longest_alias_wins() {
        let mut config = DevConfig::default();
        config
            .aliases
            .insert("@/ui".to_string(), "./src/components/ui".to_string());

        assert_eq!(config.resolve_alias("@/ui/Button"), "./src/components/ui/Button");
        assert_eq!(config.resolve_alias("@/hooks/useGroups"), "./src/hooks/useGroups");
    }

    #[test]
    fn test_proxy_for_non_api_path() {
        let config = DevConfig::default();
        assert!(config.proxy_for("/index.html").is_none());
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = DevConfig::from_toml(
            r#"
            plugins = ["react", "svg"]

            [server]
            port = 4000

            [[server.proxy]]
            prefix = "/graphql"
            target = "http://localhost:9000"
            change_origin = false
            "#,
        )
        .unwrap();

        assert_eq!(config.plugins, vec!["react", "svg"]);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.proxy.len(), 1);
        assert!(!config.server.proxy[0].change_origin);
        assert!(config.proxy_for("/api").is_none());
    }

    #[test]
    fn test_from_toml_rejects_bad_target() {
        let result = DevConfig::from_toml(
            r#"
            [[server.proxy]]
            prefix = "/api"
            target = "not a url"
            "#,
        );

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_from_toml_rejects_zero_port() {
        let result = DevConfig::from_toml("[server]\nport = 0\n");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    // `Jail` serializes these tests, so env overrides from one never leak into another.
    #[test]
    fn test_load_missing_file_uses_defaults() {
        Jail::expect_with(|jail| {
            let config = DevConfig::load(Some(&jail.directory().join("absent.toml")))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 3000);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                "root = \"web\"\n[aliases]\n\"~\" = \"./lib\"\n",
            )?;

            let config = DevConfig::load(None).map_err(|e| e.to_string())?;

            assert_eq!(config.root, PathBuf::from("web"));
            assert_eq!(config.resolve_alias("~/util"), "./lib/util");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "[server]\nport = 4000\n")?;
            jail.set_env("SWATCH_DEV_SERVER__PORT", "4100");
            jail.set_env("SWATCH_DEV_SERVER__HOST", "0.0.0.0");

            let config = DevConfig::load(None).map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 4100);
            assert_eq!(config.listen_addr(), "0.0.0.0:4100");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("SWATCH_DEV_SERVER__PORT", "0");

            let result = DevConfig::load(Some(&jail.directory().join("absent.toml")));

            assert!(matches!(result, Err(Error::InvalidConfig { .. })));
            Ok(())
        });
    }
}
