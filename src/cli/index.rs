//! Index command - load the store once and print the encrypted index.

use super::open_cache;
use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

/// Walk, armor and encrypt exactly as the server would, then print the index.
///
/// Exercises the store layout, `.gpg-id` and the gpg keyring without
/// starting a listener.
pub fn execute(config: Config) -> Result<()> {
    config.validate()?;

    let cache = open_cache(&config);
    let snapshot = cache.rebuild()?;

    output::data(snapshot.index());
    output::success(&format!("{} secrets indexed", snapshot.len()));
    Ok(())
}
