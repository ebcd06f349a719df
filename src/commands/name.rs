//! # Name Command Implementation
//!
//! Prints the library name an API path maps to, or with `--reverse` the API
//! path a library name maps back to.

use anyhow::Result;
use clap::Args;

use librarian_config::language::{Language, Packaging};
use librarian_config::naming::{derive_api_path, derive_library_name};

/// Print the library name derived from an API path
#[derive(Args, Debug)]
pub struct NameArgs {
    /// API path (e.g. google/cloud/secretmanager/v1), or a library name with
    /// --reverse.
    #[arg(value_name = "PATH")]
    pub input: String,

    /// Target language (python, go, rust, dart, java, node, dotnet).
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: String,

    /// Packaging policy (service or version). Defaults to the language's
    /// usual policy.
    #[arg(short, long, value_name = "POLICY")]
    pub packaging: Option<String>,

    /// Convert a library name back into its API path.
    #[arg(short, long)]
    pub reverse: bool,
}

/// Execute the `name` command.
pub fn execute(args: NameArgs) -> Result<()> {
    let language: Language = args.language.parse()?;
    let packaging: Packaging = match &args.packaging {
        Some(value) => value.parse()?,
        None => language.default_packaging(),
    };

    if args.reverse {
        println!("{}", derive_api_path(&args.input, packaging)?);
    } else {
        println!(
            "{}",
            derive_library_name(args.input.trim_matches('/'), language, packaging)
        );
    }
    Ok(())
}
