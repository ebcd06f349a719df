//! # API Discovery
//!
//! Walks a source tree and finds every directory that looks like a versioned
//! API, i.e. whose last path segment matches `^v\d+(alpha\d*|beta\d*)?$`.
//!
//! ```text
//! googleapis/
//! └── google/
//!     └── cloud/
//!         └── secretmanager/
//!             ├── v1/          <- discovered as google/cloud/secretmanager/v1
//!             │   └── BUILD.bazel
//!             └── v1beta2/     <- discovered, has_metadata_file = false
//! ```
//!
//! Whether the directory carries a `BUILD.bazel` file is recorded but does not
//! filter the result. Any I/O error aborts the walk; partial results are never
//! returned.

use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::Result;
use crate::naming::{is_version_segment, parse_api_path};

/// Name of the build file that carries legacy generation metadata.
pub const METADATA_FILENAME: &str = "BUILD.bazel";

/// A versioned API directory found under the source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredApi {
    /// Path relative to the source root, e.g. `google/cloud/secretmanager/v1`.
    pub path: String,
    pub service: String,
    pub namespace: String,
    pub version: String,
    /// Whether the directory contains a `BUILD.bazel` file.
    pub has_metadata_file: bool,
}

impl DiscoveredApi {
    fn new(path: String, has_metadata_file: bool) -> Self {
        let identity = parse_api_path(&path);
        Self {
            path,
            service: identity.service,
            namespace: identity.namespace,
            version: identity.version,
            has_metadata_file,
        }
    }
}

/// Discovers every versioned API below `root`, sorted by path.
pub fn discover_apis(root: &Path) -> Result<Vec<DiscoveredApi>> {
    let mut discovered = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let is_candidate = entry
            .file_name()
            .to_str()
            .is_some_and(is_version_segment);
        if !is_candidate {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let api_path = to_api_path(relative);
        let has_metadata_file = entry.path().join(METADATA_FILENAME).is_file();

        discovered.push(DiscoveredApi::new(api_path, has_metadata_file));
    }

    discovered.sort_by(|a, b| a.path.cmp(&b.path));
    discovered.dedup_by(|a, b| a.path == b.path);

    log::debug!(
        "discovered {} versioned APIs under {}",
        discovered.len(),
        root.display()
    );
    Ok(discovered)
}

/// Joins path components with forward slashes regardless of platform.
fn to_api_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
