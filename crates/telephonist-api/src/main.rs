//! Telephonist entry point.
//!
//! Binary name: `telephonist`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then either
//! serves the HTTP relay or runs a one-shot command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use telephonist_infra::config::{data_dir, load_config};
use telephonist_observe::tracing_setup::{TracingOptions, default_filter, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "telephonist", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        default_filter: default_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
        otel: cli.otel,
    })?;

    let data_dir = data_dir();
    let config = load_config(cli.config.as_deref(), &data_dir).await?;

    let result = match cli.command {
        Commands::Serve { addr, database_url } => {
            cli::serve::serve(config, addr, database_url, cli.quiet || cli.json).await
        }
        Commands::Config => cli::config::show_config(&config, cli.config.as_deref(), &data_dir, cli.json),
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
