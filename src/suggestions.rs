//! # Error Suggestions
//!
//! Helper functions for error messages that say what went wrong AND how to
//! fix it.
//!
//! ```rust,ignore
//! use librarian_config::suggestions;
//!
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

/// The configuration file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a librarian.yaml file in your repository root\n\
         hint: Use -c/--config to specify a different path",
        path = path.display()
    )
}

/// The API source tree does not exist.
pub fn source_root_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "API source tree not found: {path}\n\n\
         hint: Point -s/--source at a googleapis checkout\n\
         hint: Set the LIBRARIAN_SOURCE environment variable",
        path = path.display()
    )
}

/// The override table passed with `--overrides` does not exist.
pub fn overrides_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Override table not found: {path}\n\n\
         hint: Omit --overrides to use the built-in table",
        path = path.display()
    )
}
