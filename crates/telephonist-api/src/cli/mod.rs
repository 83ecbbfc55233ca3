//! CLI command definitions for the `telephonist` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Voice-call relay between callers and a language-tutor chat model.
#[derive(Parser)]
#[command(name = "telephonist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Machine-readable output: JSON logs for `serve`, JSON for `config`.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Configuration file (default: `{data_dir}/config.toml`).
    #[arg(long, global = true, env = "TELEPHONIST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay.
    Serve {
        /// Listen address, overrides `server.addr`.
        #[arg(long, env = "TELEPHONIST_ADDR")]
        addr: Option<String>,

        /// SQLite URL for dialogs, overrides `database.url`.
        #[arg(long, env = "TELEPHONIST_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Print the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "telephonist",
            "-vv",
            "serve",
            "--addr",
            "127.0.0.1:9000",
            "--database-url",
            "sqlite://dialogs.db",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { addr, database_url } => {
                assert_eq!(addr.as_deref(), Some("127.0.0.1:9000"));
                assert_eq!(database_url.as_deref(), Some("sqlite://dialogs.db"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["telephonist", "config", "--json", "--config", "x.toml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Config));
    }
}
