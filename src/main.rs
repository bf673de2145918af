//! Bucketcred - credentials whose password lives in a bucket.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bucketcred::cli::output;
use bucketcred::cli::{execute, Cli};
use bucketcred::core::client::default_factory;
use bucketcred::core::constants;
use bucketcred::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("bucketcred=debug")
        } else {
            EnvFilter::new("bucketcred=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, &cli.file, default_factory()) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized(_)) => Some("run: bucketcred add"),
            Error::Config(ConfigError::NotFound(_)) => Some("run: bucketcred list"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
