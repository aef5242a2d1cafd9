//! pass-server - Serve a pass password store over HTTP, still encrypted.
//!
//! Secrets in a [pass](https://www.passwordstore.org/) store are already
//! GPG-encrypted files. This server hands them out as-is, wrapped in ASCII
//! armor, together with an index of every secret that it encrypts to the
//! store's own recipients. Nothing is ever decrypted server-side.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── serve         # Run the HTTP server
//! │   ├── index         # Print the encrypted index once
//! │   └── list          # List discovered secrets
//! ├── server/           # axum routes, JSON envelopes, HTTPS redirect
//! └── core/             # Core library components
//!     ├── config        # config.toml management
//!     ├── armor         # OpenPGP ASCII armor
//!     ├── normalize     # ASCII folding of usernames
//!     ├── domain/       # SecretId, IndexItem, Snapshot
//!     ├── store/        # Walk, path decomposition, .gpg-id
//!     ├── cipher/       # Cipher trait, gpg backend, index encryption
//!     └── cache         # Lazily built, single-flight snapshot cache
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pass_server::core::cache::SecretCache;
//! use pass_server::core::cipher::Gpg;
//! use pass_server::core::domain::SecretId;
//! use pass_server::core::store::Store;
//!
//! # fn main() -> pass_server::error::Result<()> {
//! let cache = SecretCache::new(Store::new("/home/me/.password-store"), Arc::new(Gpg::default()));
//! let index = cache.list()?;
//! let secret = cache.lookup(&SecretId::new("example.com", "alice"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod server;
