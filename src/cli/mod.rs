//! Command-line interface.

pub mod index;
pub mod list;
pub mod output;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::cache::{CacheOptions, SecretCache};
use crate::core::cipher::{Cipher, Gpg};
use crate::core::config::{Config, Environment};
use crate::core::store::Store;
use crate::error::{CipherError, ConfigError, Error, Result, StoreError};

/// pass-server - Serve a pass password store over HTTP, still encrypted.
#[derive(Parser, Debug)]
#[command(
    name = "pass-server",
    about = "Serve a pass password store over HTTP, still encrypted",
    version
)]
pub struct Cli {
    /// Config file [default: ~/.config/pass-server/config.toml]
    #[arg(long, global = true, env = "PASS_SERVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Password store root
    #[arg(long, global = true, env = "PASSWORD_STORE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Options for `serve` when no command is given
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),

    /// Load the store once and print the encrypted index
    Index,

    /// List discovered secrets without encrypting anything
    List {
        /// Output index records as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options for `serve`.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, env = "PASS_SERVER_BIND")]
    pub bind: Option<String>,

    /// Deployment environment (development, test, production)
    #[arg(long = "env", env = "PASS_SERVER_ENV")]
    pub environment: Option<Environment>,

    /// Load the store before accepting connections
    #[arg(long)]
    pub preload: bool,
}

/// Log line format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    match cli.command.unwrap_or(Command::Serve(cli.serve)) {
        Command::Serve(args) => serve::execute(config, args),
        Command::Index => index::execute(config),
        Command::List { json } => list::execute(config, json),
    }
}

/// Build a cache over the configured store, encrypting with gpg.
pub fn open_cache(config: &Config) -> SecretCache {
    let store = Store::new(config.store_path());
    let cipher: Arc<dyn Cipher> = Arc::new(Gpg::from_config(&config.gpg));
    SecretCache::new(store, cipher).with_options(CacheOptions {
        sort_index: config.store.sort_index,
    })
}

/// Suggest a fix for common failures.
pub fn hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::Unavailable(inner) => hint(inner),
        Error::Cipher(CipherError::GpgNotFound { .. }) => {
            Some("install GnuPG or set [gpg] binary in config.toml")
        }
        Error::Cipher(CipherError::Failed { .. }) => {
            Some("import the public keys listed in .gpg-id into the gpg keyring")
        }
        Error::Store(StoreError::Recipients { .. } | StoreError::NoRecipients(_)) => {
            Some("add a .gpg-id file listing recipients to the store root")
        }
        Error::Store(StoreError::Walk(_)) => Some("check --store or PASSWORD_STORE"),
        Error::Config(ConfigError::Parse { .. } | ConfigError::ReadFile { .. }) => {
            Some("check --config or PASS_SERVER_CONFIG")
        }
        _ => None,
    }
}
