//! # Discover Command Implementation
//!
//! Lists every versioned API directory under a source tree, whether or not it
//! would end up in a library. Exclusions are not applied.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use librarian_config::discovery::discover_apis;
use librarian_config::suggestions;

use super::{render, OutputFormat};

/// List the versioned APIs found in a source tree
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Root of the API source tree (a googleapis checkout).
    #[arg(short, long, value_name = "DIR", env = "LIBRARIAN_SOURCE")]
    pub source: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

/// Execute the `discover` command.
pub fn execute(args: DiscoverArgs) -> Result<()> {
    if !args.source.is_dir() {
        return Err(suggestions::source_root_not_found(&args.source));
    }

    let apis = discover_apis(&args.source)?;
    log::info!("found {} versioned APIs", apis.len());
    print!("{}", render(&apis, args.format)?);
    Ok(())
}
