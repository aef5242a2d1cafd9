//! pass-server - Serve a pass password store over HTTP, still encrypted.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pass_server::cli::{self, execute, output, Cli, LogFormat};
use pass_server::core::constants::LOG_ENV;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("pass_server=debug,tower_http=debug")
        } else {
            EnvFilter::new("pass_server=info")
        }
    });

    // stdout is reserved for command output
    let json = cli.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = cli::hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
