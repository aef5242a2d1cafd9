//! Constants used throughout pass-server.
//!
//! Centralizes magic strings and configuration values.

use std::time::Duration;

/// Recipient list at the store root (`.gpg-id`).
pub const GPG_ID_FILE: &str = ".gpg-id";

/// Extension carried by every secret file.
pub const SECRET_EXTENSION: &str = "gpg";

/// Directory name never descended into while walking the store.
pub const GIT_DIR: &str = ".git";

/// Armor block label for secrets and the encrypted index.
pub const ARMOR_LABEL: &str = "PGP MESSAGE";

/// Default store location relative to HOME (~/.password-store).
pub const DEFAULT_STORE_DIR: &str = ".password-store";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default gpg executable, looked up on PATH.
pub const DEFAULT_GPG_BINARY: &str = "gpg";

/// Default upper bound on a single gpg invocation.
pub const DEFAULT_GPG_TIMEOUT: Duration = Duration::from_secs(60);

/// Config file name inside the user config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Application directory name inside the user config directory.
pub const APP_DIR: &str = "pass-server";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PASS_SERVER_LOG";
