//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand, which prints every library
//! described by a `librarian.yaml` configuration together with its APIs and
//! merged settings.
//!
//! This command is a safe, read-only operation: neither the configuration nor
//! the source tree is modified.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use librarian_config::config::Config;
use librarian_config::defaults::DEFAULT_CONFIG_FILENAME;
use librarian_config::overrides::Overrides;
use librarian_config::resolve::resolve_libraries_with;
use librarian_config::suggestions;

use super::{render, OutputFormat};

/// Resolve the libraries described by a configuration file
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the librarian.yaml configuration file.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Root of the API source tree (a googleapis checkout).
    #[arg(short, long, value_name = "DIR", env = "LIBRARIAN_SOURCE")]
    pub source: PathBuf,

    /// Exclusion and override table to use instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(suggestions::config_not_found(&args.config));
    }
    if !args.source.is_dir() {
        return Err(suggestions::source_root_not_found(&args.source));
    }

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let custom;
    let overrides = match &args.overrides {
        Some(path) => {
            if !path.exists() {
                return Err(suggestions::overrides_not_found(path));
            }
            custom = Overrides::from_file(path)
                .with_context(|| format!("Failed to load overrides from {}", path.display()))?;
            log::debug!(
                "using {:?} override table from {}",
                custom.schema(),
                path.display()
            );
            &custom
        }
        None => Overrides::builtin(),
    };

    let libraries = resolve_libraries_with(&args.source, &config, overrides)?;
    print!("{}", render(&libraries, args.format)?);
    Ok(())
}
