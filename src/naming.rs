//! # Naming Conventions
//!
//! Converts between slash-separated API paths such as
//! `google/cloud/secretmanager/v1` and the library names each language uses
//! for them.
//!
//! | Language | `service` packaging           | `version` packaging              |
//! |----------|-------------------------------|----------------------------------|
//! | Python   | `google-cloud-secretmanager`  | `google-cloud-secretmanager-v1`  |
//! | Rust     | `google-cloud-secretmanager`  | `google-cloud-secretmanager-v1`  |
//! | Dart     | `google_cloud_secretmanager`  | `google_cloud_secretmanager_v1`  |
//! | Go       | `secretmanager`               | `secretmanager-v1`               |
//!
//! Java, Node and .NET use the bare service name like Go.
//!
//! The inverse, [`derive_api_path`], only works for `version` packaging:
//! a `service` library name does not say which version it came from, so that
//! direction returns [`Error::Naming`]. Use [`derive_service_path`] when the
//! versionless service path is all that is needed.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::language::{Language, Packaging};

/// Root segment shared by most API paths.
const ROOT_SEGMENT: &str = "google";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v\d+(alpha\d*|beta\d*)?$").expect("version pattern is a valid regex")
    })
}

/// Returns true if `segment` is an API version such as `v1`, `v2alpha` or
/// `v1beta1`.
///
/// # Examples
///
/// ```
/// use librarian_config::naming::is_version_segment;
///
/// assert!(is_version_segment("v1beta1"));
/// assert!(!is_version_segment("version1"));
/// ```
pub fn is_version_segment(segment: &str) -> bool {
    version_pattern().is_match(segment)
}

/// Structured identity of an API path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiIdentity {
    /// Last non-version segment, e.g. `secretmanager`.
    pub service: String,
    /// First segment after the `google` root when there are two or more,
    /// e.g. `cloud`.
    pub namespace: String,
    /// Trailing version segment, e.g. `v1`.
    pub version: String,
}

impl ApiIdentity {
    /// Key shared by every version of the same service.
    pub fn service_key(&self) -> String {
        if self.namespace.is_empty() {
            self.service.clone()
        } else {
            format!("{}/{}", self.namespace, self.service)
        }
    }
}

/// Splits an API path into its service, namespace and version.
///
/// A leading `google` segment is ignored. An empty path yields an identity
/// with every field empty.
pub fn parse_api_path(path: &str) -> ApiIdentity {
    let mut parts: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if parts.first() == Some(&ROOT_SEGMENT) {
        parts.remove(0);
    }

    let mut identity = ApiIdentity::default();
    if let Some(last) = parts.last() {
        if is_version_segment(last) {
            identity.version = last.to_string();
            parts.pop();
        }
    }

    match parts.len() {
        0 => {}
        1 => identity.service = parts[0].to_string(),
        n => {
            identity.namespace = parts[0].to_string();
            identity.service = parts[n - 1].to_string();
        }
    }
    identity
}

/// Derives the library name for an API path.
///
/// Hyphen- and underscore-joined names keep every path segment, including any
/// segments between the namespace and the service, so that
/// `derive_api_path(derive_library_name(p, ..))` gives back `p` under
/// `version` packaging. The version segment is only kept under `version`
/// packaging.
pub fn derive_library_name(path: &str, language: Language, packaging: Packaging) -> String {
    match language {
        Language::Python | Language::Rust => join_segments(path, packaging, "-"),
        Language::Dart => join_segments(path, packaging, "_"),
        Language::Go | Language::Java | Language::Node | Language::Dotnet => {
            let identity = parse_api_path(path);
            if packaging == Packaging::Version && !identity.version.is_empty() {
                format!("{}-{}", identity.service, identity.version)
            } else {
                identity.service
            }
        }
    }
}

fn join_segments(path: &str, packaging: Packaging, separator: &str) -> String {
    let mut parts: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if packaging == Packaging::Service {
        if let Some(last) = parts.last() {
            if is_version_segment(last) {
                parts.pop();
            }
        }
    }
    parts.join(separator)
}

/// Converts a library name back into the API path it was derived from.
///
/// Only `version` packaging is reversible; the name must end in a version
/// segment.
pub fn derive_api_path(name: &str, packaging: Packaging) -> Result<String> {
    if packaging == Packaging::Service {
        return Err(Error::Naming {
            name: name.to_string(),
            message: "service packaging drops the API version, so only the service path \
                      can be recovered"
                .to_string(),
        });
    }

    let path = derive_service_path(name);
    let ends_in_version = path.rsplit('/').next().is_some_and(is_version_segment);
    if !ends_in_version {
        return Err(Error::Naming {
            name: name.to_string(),
            message: "name does not end in a version segment".to_string(),
        });
    }
    Ok(path)
}

/// Converts a library name into a path by reversing the `-`/`_` separators.
///
/// For a `service` packaged name this is the versionless service path, e.g.
/// `google-cloud-secretmanager` becomes `google/cloud/secretmanager`.
pub fn derive_service_path(name: &str) -> String {
    name.replace(['-', '_'], "/")
}
