//! Configuration file management.
//!
//! Handles reading and validating the optional `config.toml`. Every field has
//! a default, so running without a file works. Command-line flags and
//! environment variables are layered on top by the CLI.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub gpg: GpgConfig,
}

/// Where the password store lives and how it is indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Store root. A leading `~/` expands to the home directory.
    pub path: PathBuf,
    /// Sort index records by domain, path, username instead of walk order.
    pub sort_index: bool,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub environment: Environment,
}

/// gpg invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpgConfig {
    /// Executable name or path.
    pub binary: String,
    /// Upper bound on one encryption, in seconds. 0 waits forever.
    pub timeout_secs: u64,
    /// Passed as `--homedir` when set.
    pub homedir: Option<PathBuf>,
    /// Extra arguments placed before the recipients.
    pub extra_args: Vec<String>,
}

/// Deployment environment.
///
/// `Production` redirects plain-HTTP requests to HTTPS and turns off
/// per-request logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let path = dirs::home_dir()
            .map(|home| home.join(constants::DEFAULT_STORE_DIR))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            path,
            sort_index: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: constants::DEFAULT_BIND.to_string(),
            environment: Environment::default(),
        }
    }
}

impl Default for GpgConfig {
    fn default() -> Self {
        Self {
            binary: constants::DEFAULT_GPG_BINARY.to_string(),
            timeout_secs: constants::DEFAULT_GPG_TIMEOUT.as_secs(),
            homedir: None,
            extra_args: Vec::new(),
        }
    }
}

impl GpgConfig {
    /// Timeout as a duration, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Invalid(format!(
                "unknown environment: {}. Supported: development, test, production",
                other
            ))),
        }
    }
}

impl Config {
    /// Default config file location (`$XDG_CONFIG_HOME/pass-server/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present, otherwise built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for a bad file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config)
    }

    /// Store root with `~` expanded.
    pub fn store_path(&self) -> PathBuf {
        expand_home(&self.store.path)
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            ConfigError::Invalid(format!("invalid bind address {:?}: {}", self.server.bind, e))
                .into()
        })
    }

    /// Validate the configuration structure and contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store path is empty".to_string()).into());
        }
        if self.gpg.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("gpg binary is empty".to_string()).into());
        }
        self.bind_addr()?;
        Ok(())
    }
}

/// Expand a leading `~` against the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.gpg.timeout(), Some(Duration::from_secs(60)));
        assert!(!config.store.sort_index);
    }

    #[test]
    fn test_parse_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
path = "/srv/pass"
sort_index = true

[server]
bind = "0.0.0.0:9000"
environment = "production"

[gpg]
binary = "/usr/bin/gpg2"
timeout_secs = 0
homedir = "/srv/gnupg"
extra_args = ["--compress-algo", "none"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/srv/pass"));
        assert!(config.store.sort_index);
        assert!(config.server.environment.is_production());
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
        assert_eq!(config.gpg.timeout(), None);
        assert_eq!(config.gpg.homedir, Some(PathBuf::from("/srv/gnupg")));
        assert_eq!(config.gpg.extra_args, vec!["--compress-algo", "none"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:1234\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.gpg.binary, "gpg");
        assert_eq!(config.bind_addr().unwrap().port(), 1234);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\npaht = \"/typo\"\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_store_path_rejected() {
        let mut config = Config::default();
        config.store.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/.password-store")),
                home.join(".password-store")
            );
        }
        assert_eq!(expand_home(Path::new("/abs/store")), PathBuf::from("/abs/store"));
        assert_eq!(expand_home(Path::new("~user/store")), PathBuf::from("~user/store"));
    }
}
