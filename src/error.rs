//! Error types.
//!
//! Errors are grouped by the area that raises them and folded into the
//! top-level [`Error`] with `#[from]` conversions, so `?` works across layers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::core::domain::SecretId;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identifier is not part of the current snapshot.
    #[error("unknown secret")]
    NotFound(SecretId),

    /// A rebuild failed; every caller that joined it shares the same cause.
    #[error("unable to load password store: {0}")]
    Unavailable(#[source] Arc<Error>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something unusable.
    Validation,
    /// The request was well formed but names nothing we have.
    NotFound,
    /// The store could not be loaded.
    Unavailable,
    /// Anything else.
    Internal,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) | Self::Store(_) | Self::Cipher(_) => ErrorKind::Unavailable,
            Self::Config(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while reading the password store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("issue while discovering secrets: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read secret {path}: {source}")]
    ReadSecret {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("secret path {path} is not a secret below {root}")]
    OutsideStore { path: PathBuf, root: PathBuf },

    #[error("unable to load .gpg-id from {path}: {source}")]
    Recipients {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no recipients listed in {0}")]
    NoRecipients(PathBuf),
}

/// Errors raised while encrypting or armoring.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("gpg binary not found ({binary}): {source}. Install GnuPG from https://gnupg.org/download/")]
    GpgNotFound {
        binary: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to run gpg: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("gpg encrypt failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("gpg did not finish within {0:?}")]
    Timeout(Duration),

    #[error("gpg output is not ASCII armor: {0}")]
    NotArmored(String),

    #[error("no recipients provided")]
    NoRecipients,

    #[error("failed to create index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid armor: {0}")]
    Armor(String),
}

/// Request validation errors. These never reach the cache.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("unable to read request body: {0}")]
    Body(String),

    #[error("no {0} found in request body")]
    MissingField(&'static str),

    #[error("no {0} header in request")]
    MissingHeader(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
