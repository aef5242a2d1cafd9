//! List command - show discovered secrets.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::domain::IndexItem;
use crate::core::store::Store;
use crate::error::{Error, Result};

/// Walk the store and print every secret identifier.
///
/// Nothing is read from the secret files and nothing is encrypted.
pub fn execute(config: Config, json: bool) -> Result<()> {
    let store = Store::new(config.store_path());
    let items: Vec<IndexItem> = store
        .discover()?
        .into_iter()
        .map(|secret| secret.item)
        .collect();

    if json {
        let rendered =
            serde_json::to_string_pretty(&items).map_err(|e| Error::Io(e.into()))?;
        output::data(&rendered);
        return Ok(());
    }

    if items.is_empty() {
        output::warn("no secrets found");
        output::hint(&format!("store root: {}", store.root().display()));
        return Ok(());
    }

    for item in &items {
        output::data(&item.id().to_string());
    }
    Ok(())
}
