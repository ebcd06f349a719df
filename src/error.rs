//! # Error Handling
//!
//! This module defines the centralized error type for `librarian-config`. It
//! uses the `thiserror` library to build a single `Error` enum covering every
//! failure the resolution engine can surface to its caller.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum of all errors returned by the library. Each
//!   variant carries the library name, path, or policy value needed to
//!   diagnose the problem without re-running in verbose mode.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! ## Hard and soft failures
//!
//! Only hard failures reach the caller of
//! [`resolve_libraries`](crate::resolve::resolve_libraries):
//!
//! - Configuration parsing errors.
//! - Unknown packaging policies.
//! - Validation errors (ambiguous templates, empty or duplicate libraries).
//! - An unreadable source tree.
//!
//! Missing or malformed supplementary sources (service descriptions and
//! legacy build files) are reported as [`Error::ServiceDescription`] or
//! [`Error::Io`] by the extractors themselves, but the resolver logs and
//! discards them, so the feature they would enable is simply absent.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for librarian-config operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing a configuration or override file.
    ///
    /// Includes an optional hint about how to fix the document.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The packaging policy (`one_library_per`) is not recognised.
    #[error("Unknown packaging policy: {value:?} (expected \"service\" or \"version\")")]
    Packaging { value: String },

    /// A library failed validation.
    #[error("Invalid library {library:?}: {message}")]
    Validation { library: String, message: String },

    /// An output template could not be expanded.
    ///
    /// May include the placeholder that caused the error.
    #[error("Template expansion error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The placeholder that caused the error, if applicable
        variable: Option<String>,
    },

    /// A library name could not be converted back into an API path.
    #[error("Cannot derive API path from {name:?}: {message}")]
    Naming { name: String, message: String },

    /// The source tree root could not be read.
    #[error("Cannot read source root {}: {source}", path.display())]
    SourceRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A service description file exists but could not be parsed.
    #[error("Invalid service description {}: {message}", path.display())]
    ServiceDescription { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk failed, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
