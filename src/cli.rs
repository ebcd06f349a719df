//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use librarian_config::defaults::DEFAULT_LOG_LEVEL;

use crate::commands;

/// Librarian Config - Resolve client library configuration from an API tree
#[derive(Parser, Debug)]
#[command(name = "librarian-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, value_name = "LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the libraries described by a configuration file
    Resolve(commands::resolve::ResolveArgs),

    /// List the versioned APIs found in a source tree
    Discover(commands::discover::DiscoverArgs),

    /// Print the library name derived from an API path
    Name(commands::name::NameArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Discover(args) => commands::discover::execute(args),
            Commands::Name(args) => commands::name::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // Fails only if a logger is already installed.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
