//! # Librarian Configuration Library
//!
//! This library answers, for a pipeline that generates per-language client
//! libraries from a tree of versioned API definitions, the question "what
//! libraries exist, which APIs do they contain, and which settings apply to
//! each". It is used by the `librarian-config` command-line tool and is meant
//! to be called by generation and release tooling.
//!
//! ## Quick Example
//!
//! ```
//! use librarian_config::config::Config;
//! use librarian_config::overrides::Overrides;
//! use librarian_config::resolve::resolve_libraries_with;
//!
//! let source = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(source.path().join("google/cloud/secretmanager/v1")).unwrap();
//! std::fs::create_dir_all(source.path().join("google/cloud/secretmanager/v1beta2")).unwrap();
//!
//! let config = Config::parse("language: python\nlibraries: ['*']\n").unwrap();
//! let libraries = resolve_libraries_with(source.path(), &config, &Overrides::default()).unwrap();
//!
//! assert_eq!(libraries.len(), 1);
//! assert_eq!(libraries[0].name, "google-cloud-secretmanager");
//! assert_eq!(libraries[0].apis.len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The schema of `librarian.yaml`: language,
//!   defaults and the explicit library list.
//! - **Naming (`naming`, `language`)**: Converts API paths such as
//!   `google/cloud/secretmanager/v1` to library names and back, under the
//!   `service` and `version` packaging policies.
//! - **Discovery (`discovery`, `pattern`, `overrides`)**: Finds versioned API
//!   directories and filters out excluded ones.
//! - **Extraction (`legacy`, `service_config`)**: Recovers generation and
//!   publishing settings from build files and service descriptions.
//! - **Resolution (`resolve`, `library`, `template`)**: Groups APIs into
//!   libraries and merges every settings layer onto them.
//!
//! ## Execution Flow
//!
//! [`resolve::resolve_libraries`] is the main entry point:
//!
//! 1.  **Collect**: Read the explicit library entries and claim their APIs.
//! 2.  **Discover**: Walk the source tree when the `"*"` entry is present.
//! 3.  **Filter**: Drop excluded and already claimed APIs.
//! 4.  **Group**: Name the remaining APIs and bucket them by packaging policy.
//! 5.  **Enrich**: Fill empty settings from service descriptions, build files
//!     and defaults, in that order.
//! 6.  **Output**: Return the libraries sorted by name.

pub mod config;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod language;
pub mod legacy;
pub mod library;
pub mod naming;
pub mod overrides;
pub mod pattern;
pub mod resolve;
pub mod service_config;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod naming_proptest;
