//! Serve command - run the HTTP server.

use std::sync::Arc;

use tracing::{info, warn};

use super::{open_cache, ServeArgs};
use crate::core::config::Config;
use crate::error::Result;
use crate::server;

/// Apply serve overrides, then block on the server until shutdown.
pub fn execute(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(environment) = args.environment {
        config.server.environment = environment;
    }
    config.validate()?;
    let addr = config.bind_addr()?;

    let cache = Arc::new(open_cache(&config));
    info!(store = %cache.store().root().display(), "serving password store");

    if args.preload {
        // a failed preload is retried by the first request
        match cache.rebuild() {
            Ok(snapshot) => info!(secrets = snapshot.len(), "store preloaded"),
            Err(e) => warn!(error = %e, "preload failed"),
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(cache, addr, config.server.environment))
}
