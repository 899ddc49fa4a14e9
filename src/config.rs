use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "users.toml";

pub const DEFAULT_SEED_USERS: &[&str] = &["Jane Doe", "John Doe", "Jack Doe"];

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_seed_users")]
    pub seed_users: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_redirect_url() -> String {
    "https://lambdaschool.com".to_string()
}

fn default_seed_users() -> Vec<String> {
    DEFAULT_SEED_USERS.iter().map(|s| s.to_string()).collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redirect_url: default_redirect_url(),
            seed_users: default_seed_users(),
        }
    }
}

/// Values given on the command line; each one overrides file and env settings
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Defaults, then config file, then environment, then CLI flags.
    ///
    /// An explicit `config_path` must exist; the default `users.toml` is optional.
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        let mut config = match &overrides.config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if let Some(host) = &overrides.host {
            config.host = host.clone();
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }

        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `REDIRECT_URL` from the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(url) = lookup("REDIRECT_URL") {
            self.redirect_url = url;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.seed_users.len(), 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000\nseed_users = []").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.seed_users.is_empty());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("PORT", "3000"), ("REDIRECT_URL", "https://example.com")]
            .into_iter()
            .collect();
        let mut config = ServerConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.redirect_url, "https://example.com");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_bad_port_env_is_error() {
        let mut config = ServerConfig::default();
        let result = config.apply_env(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let overrides = CliOverrides {
            config_path: Some(PathBuf::from("/nonexistent/users.toml")),
            ..Default::default()
        };
        assert!(ServerConfig::load(&overrides).is_err());
    }
}
