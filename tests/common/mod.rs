//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = SourceTree::new()
//!         .with_api("google/cloud/kms/v1")
//!         .with_config(configs::PYTHON_WILDCARD);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::Command;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{cmd, configs, SourceTree};
}

/// Command for the `librarian-config` binary, isolated from the caller's
/// environment.
#[allow(dead_code)]
pub fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("librarian-config").unwrap();
    cmd.env_remove("LIBRARIAN_SOURCE").env_remove("RUST_LOG");
    cmd
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Python, every API discovered.
    pub const PYTHON_WILDCARD: &str = "language: python\nlibraries: ['*']\n";

    /// Rust, every API discovered.
    pub const RUST_WILDCARD: &str = "language: rust\nlibraries: ['*']\n";

    /// Go, every API discovered.
    pub const GO_WILDCARD: &str = "language: go\nlibraries: ['*']\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "language: [python\n";

    /// A python gapic rule with the settings the resolver picks up.
    pub const PY_BUILD: &str = r#"
py_gapic_library(
    name = "x_py_gapic",
    srcs = [":x_proto"],
    grpc_service_config = "x_grpc_service_config.json",
    opt_args = [
        "warehouse-package-name=google-cloud-x",
    ],
    rest_numeric_enums = True,
    service_yaml = "x_v1.yaml",
    transport = "grpc+rest",
)
"#;
}

/// A temporary googleapis-style source tree with a working directory next to
/// it for the configuration file.
#[allow(dead_code)]
pub struct SourceTree {
    root: TempDir,
}

#[allow(dead_code)]
impl SourceTree {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        root.child("googleapis").create_dir_all().unwrap();
        Self { root }
    }

    /// Adds an empty API directory.
    pub fn with_api(self, api_path: &str) -> Self {
        self.root
            .child("googleapis")
            .child(api_path)
            .create_dir_all()
            .unwrap();
        self
    }

    /// Adds a file below the source root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.root
            .child("googleapis")
            .child(path)
            .write_str(content)
            .unwrap();
        self
    }

    /// Writes `librarian.yaml` into the working directory.
    pub fn with_config(self, yaml: &str) -> Self {
        self.root.child("librarian.yaml").write_str(yaml).unwrap();
        self
    }

    /// Working directory holding `librarian.yaml`.
    pub fn workdir(&self) -> &Path {
        self.root.path()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.root.path().join("librarian.yaml")
    }

    pub fn source(&self) -> std::path::PathBuf {
        self.root.path().join("googleapis")
    }
}
