//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the `librarian.yaml`
//! configuration file, as well as the logic for parsing it.
//!
//! ## Key Components
//!
//! - **`Config`**: The whole document: the target language, repository-wide
//!   `defaults`, release settings and the list of libraries.
//!
//! - **`LibraryEntry`**: One item of the `libraries` list. It is either the
//!   wildcard `"*"`, meaning "discover every API not listed elsewhere", or a
//!   named library with an optional override block.
//!
//! - **`LibraryConfig`**: The override block of a named library. Every value
//!   set here takes precedence over anything extracted from the source tree.
//!
//! - **`ApiRef`**: An API reference, written either as a bare path or as a
//!   mapping carrying the path and its specification format.
//!
//! ## Format
//!
//! ```yaml
//! version: v0.5.0
//! language: python
//! defaults:
//!   output: packages/{name}
//!   one_library_per: service
//!   transport: grpc+rest
//!   exclude_apis:
//!     - google/cloud/bigquery/logging/v1
//! release:
//!   tag_format: "{name}/v{version}"
//! libraries:
//!   - "*"
//!   - google-cloud-secret-manager:
//!       apis:
//!         - google/cloud/secretmanager/v1
//!         - google/cloud/secretmanager/v1beta2
//!       transport: grpc
//!   - google-cloud-common:
//!       path: packages/google-cloud-common
//! ```
//!
//! Both union shapes are resolved while parsing, so code downstream matches on
//! enum variants instead of inspecting YAML values.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::defaults::DEFAULT_TAG_FORMAT;
use crate::error::{Error, Result};
use crate::language::{Language, Packaging};

/// Library name that stands for every discovered API.
pub const WILDCARD: &str = "*";

/// Root of the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Version of the tool that wrote the file.
    #[serde(default)]
    pub version: String,
    pub language: Language,
    #[serde(default)]
    pub defaults: Option<Defaults>,
    #[serde(default)]
    pub release: Option<Release>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
}

/// Repository-wide settings, the lowest precedence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Output directory template, e.g. `packages/{name}` or `src/{api.path}`.
    pub output: Option<String>,
    /// Packaging policy: `service` or `version`.
    pub one_library_per: Option<String>,
    pub transport: Option<String>,
    pub rest_numeric_enums: Option<bool>,
    pub release_level: Option<String>,
    /// Extra exclusion patterns on top of the built-in table.
    pub exclude_apis: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    /// Template for release tags, e.g. `{name}/v{version}`.
    pub tag_format: Option<String>,
}

/// A reference to one API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiRef {
    /// `api: google/cloud/secretmanager/v1`
    Path(String),
    /// `api: {path: google/cloud/compute/v1, specification_format: discovery}`
    Detailed {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        specification_format: Option<String>,
    },
}

impl ApiRef {
    /// The API path without leading or trailing slashes.
    pub fn path(&self) -> &str {
        match self {
            ApiRef::Path(path) | ApiRef::Detailed { path, .. } => path.trim_matches('/'),
        }
    }

    pub fn specification_format(&self) -> Option<&str> {
        match self {
            ApiRef::Path(_) => None,
            ApiRef::Detailed {
                specification_format,
                ..
            } => specification_format.as_deref(),
        }
    }
}

/// Python generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonSettings {
    /// Extra generator arguments, e.g. `warehouse-package-name=...`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opt_args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_async_io_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unversioned_package_disabled: Option<bool>,
}

/// Go generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_services: BTreeMap<String, String>,
}

/// Java generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub service_class_names: BTreeMap<String, String>,
}

/// Node.js generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    /// Fully qualified methods to generate when only a subset is wanted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selective_methods: Vec<String>,
}

/// .NET generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotnetSettings {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_services: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_resources: BTreeMap<String, String>,
}

/// Rust generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RustSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name_override: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled_rustdoc_warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled_clippy_warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_for_publication: Option<bool>,
}

/// Dart generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DartSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_keys_environment_variables: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,
}

/// Explicit settings for one named library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// A single API. Combined with `apis` when both are set.
    pub api: Option<ApiRef>,
    pub apis: Vec<ApiRef>,
    /// Explicit location; a library with a path and no APIs is handwritten.
    pub path: Option<String>,
    /// Current released version.
    pub version: Option<String>,
    /// Files the generator must not overwrite.
    pub keep: Vec<String>,
    /// Files to delete after generation.
    pub remove: Vec<String>,
    /// Disables automatic releases.
    pub disabled: bool,
    pub transport: Option<String>,
    pub rest_numeric_enums: Option<bool>,
    pub release_level: Option<String>,
    pub launch_stage: Option<String>,
    pub destinations: Vec<String>,
    pub python: Option<PythonSettings>,
    pub go: Option<GoSettings>,
    pub java: Option<JavaSettings>,
    pub node: Option<NodeSettings>,
    pub dotnet: Option<DotnetSettings>,
    pub rust: Option<RustSettings>,
    pub dart: Option<DartSettings>,
}

impl LibraryConfig {
    /// All configured API paths, `api` first, in file order.
    pub fn api_paths(&self) -> Vec<String> {
        self.api
            .iter()
            .chain(self.apis.iter())
            .map(|api| api.path().to_string())
            .filter(|path| !path.is_empty())
            .collect()
    }
}

/// One item of the `libraries` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum LibraryEntry {
    /// `"*"`: auto-discover everything not otherwise listed.
    Wildcard,
    /// `name` or `name: {...}`.
    Named { name: String, config: LibraryConfig },
}

impl LibraryEntry {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, LibraryEntry::Wildcard)
    }

    fn from_name(name: String, config: LibraryConfig) -> Result<Self> {
        if name == WILDCARD {
            return Ok(LibraryEntry::Wildcard);
        }
        if name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "library entry has an empty name".to_string(),
                hint: None,
            });
        }
        Ok(LibraryEntry::Named { name, config })
    }
}

impl TryFrom<Value> for LibraryEntry {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => LibraryEntry::from_name(name, LibraryConfig::default()),
            Value::Mapping(map) => {
                let keys = map.len();
                let (key, body) = match map.into_iter().next() {
                    Some(pair) if keys == 1 => pair,
                    _ => {
                        return Err(Error::ConfigParse {
                            message: format!(
                                "library entry must have exactly one name, found {} keys",
                                keys
                            ),
                            hint: Some(
                                "Write entries as `- name: {...}` or `- name`".to_string(),
                            ),
                        })
                    }
                };
                let name = match key {
                    Value::String(name) => name,
                    other => {
                        return Err(Error::ConfigParse {
                            message: format!("library name must be a string, got {:?}", other),
                            hint: None,
                        })
                    }
                };
                let config = match body {
                    Value::Null => LibraryConfig::default(),
                    body => serde_yaml::from_value(body).map_err(|e| Error::ConfigParse {
                        message: format!("library {:?}: {}", name, e),
                        hint: None,
                    })?,
                };
                LibraryEntry::from_name(name, config)
            }
            other => Err(Error::ConfigParse {
                message: format!("library entry must be a string or a mapping, got {:?}", other),
                hint: None,
            }),
        }
    }
}

impl Config {
    /// Parses a configuration document.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "configuration file is empty".to_string(),
                hint: Some("At minimum set `language`".to_string()),
            });
        }
        let config: Config = serde_yaml::from_str(yaml_content)?;
        Ok(config)
    }

    /// Parses a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The packaging policy in effect, falling back to the language default.
    pub fn packaging(&self) -> Result<Packaging> {
        match self
            .defaults
            .as_ref()
            .and_then(|d| d.one_library_per.as_deref())
        {
            Some(value) => value.parse(),
            None => Ok(self.language.default_packaging()),
        }
    }

    /// Release tag template, `{name}/v{version}` unless configured.
    pub fn tag_format(&self) -> &str {
        self.release
            .as_ref()
            .and_then(|r| r.tag_format.as_deref())
            .unwrap_or(DEFAULT_TAG_FORMAT)
    }

    /// Returns true if the library list contains the `"*"` entry.
    pub fn has_wildcard(&self) -> bool {
        self.libraries.iter().any(LibraryEntry::is_wildcard)
    }

    /// Exclusion patterns from `defaults.exclude_apis`.
    pub fn exclude_patterns(&self) -> &[String] {
        self.defaults
            .as_ref()
            .map(|d| d.exclude_apis.as_slice())
            .unwrap_or_default()
    }

    /// Appends a library to the configuration.
    ///
    /// A library with a `location` is handwritten and its name must be unique.
    /// Otherwise at least one API is required, and the same name may only
    /// appear again with a different API list.
    pub fn add_library(&mut self, name: &str, apis: &[String], location: Option<&str>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                library: name.to_string(),
                message: "library name cannot be empty".to_string(),
            });
        }

        if let Some(location) = location {
            if self.named_entries().any(|(existing, _)| existing == name) {
                return Err(Error::Validation {
                    library: name.to_string(),
                    message: "library already exists".to_string(),
                });
            }
            self.libraries.push(LibraryEntry::Named {
                name: name.to_string(),
                config: LibraryConfig {
                    path: Some(location.to_string()),
                    ..LibraryConfig::default()
                },
            });
            return Ok(());
        }

        if apis.is_empty() {
            return Err(Error::Validation {
                library: name.to_string(),
                message: "library must have at least one API or a location".to_string(),
            });
        }

        let duplicate = self
            .named_entries()
            .any(|(existing, config)| existing == name && config.api_paths() == apis);
        if duplicate {
            return Err(Error::Validation {
                library: name.to_string(),
                message: format!("library with APIs {:?} already exists", apis),
            });
        }

        self.libraries.push(LibraryEntry::Named {
            name: name.to_string(),
            config: LibraryConfig {
                apis: apis.iter().cloned().map(ApiRef::Path).collect(),
                ..LibraryConfig::default()
            },
        });
        Ok(())
    }

    /// Named entries in file order.
    pub fn named_entries(&self) -> impl Iterator<Item = (&str, &LibraryConfig)> {
        self.libraries.iter().filter_map(|entry| match entry {
            LibraryEntry::Named { name, config } => Some((name.as_str(), config)),
            LibraryEntry::Wildcard => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
version: v0.5.0
language: python
defaults:
  output: packages/{name}
  one_library_per: service
  transport: grpc+rest
  rest_numeric_enums: true
  release_level: stable
  exclude_apis:
    - google/cloud/bigquery/logging/v1
release:
  tag_format: "{name}/v{version}"
libraries:
  - "*"
  - google-cloud-secret-manager:
      apis:
        - google/cloud/secretmanager/v1
        - google/cloud/secretmanager/v1beta2
      transport: grpc
      keep:
        - CHANGELOG.md
      python:
        opt_args:
          - warehouse-package-name=google-cloud-secret-manager
  - google-cloud-common:
      path: packages/google-cloud-common
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.version, "v0.5.0");
        assert_eq!(config.language, Language::Python);
        assert!(config.has_wildcard());
        assert_eq!(config.packaging().unwrap(), Packaging::Service);
        assert_eq!(config.exclude_patterns(), ["google/cloud/bigquery/logging/v1"]);
        assert_eq!(
            config.release.as_ref().unwrap().tag_format.as_deref(),
            Some("{name}/v{version}")
        );

        let named: Vec<_> = config.named_entries().collect();
        assert_eq!(named.len(), 2);
        let (name, secretmanager) = named[0];
        assert_eq!(name, "google-cloud-secret-manager");
        assert_eq!(
            secretmanager.api_paths(),
            vec!["google/cloud/secretmanager/v1", "google/cloud/secretmanager/v1beta2"]
        );
        assert_eq!(secretmanager.transport.as_deref(), Some("grpc"));
        assert_eq!(secretmanager.keep, vec!["CHANGELOG.md"]);
        assert_eq!(
            secretmanager.python.as_ref().unwrap().opt_args,
            vec!["warehouse-package-name=google-cloud-secret-manager"]
        );

        let (_, common) = named[1];
        assert!(common.api_paths().is_empty());
        assert_eq!(common.path.as_deref(), Some("packages/google-cloud-common"));
    }

    #[test]
    fn test_entry_shapes() {
        let yaml = r#"
language: rust
libraries:
  - google-cloud-kms-v1
  - google-cloud-secretmanager-v1:
  - google-cloud-compute-v1:
      api:
        path: google/cloud/compute/v1
        specification_format: discovery
  - google-cloud-pubsub-v1:
      api: /google/pubsub/v1/
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(!config.has_wildcard());
        assert_eq!(
            config.libraries[0],
            LibraryEntry::Named {
                name: "google-cloud-kms-v1".to_string(),
                config: LibraryConfig::default(),
            }
        );
        assert_eq!(
            config.libraries[1],
            LibraryEntry::Named {
                name: "google-cloud-secretmanager-v1".to_string(),
                config: LibraryConfig::default(),
            }
        );

        let (_, compute) = config.named_entries().nth(2).unwrap();
        let api = compute.api.as_ref().unwrap();
        assert_eq!(api.path(), "google/cloud/compute/v1");
        assert_eq!(api.specification_format(), Some("discovery"));

        let (_, pubsub) = config.named_entries().nth(3).unwrap();
        assert_eq!(pubsub.api_paths(), vec!["google/pubsub/v1"]);
        assert_eq!(pubsub.api.as_ref().unwrap().specification_format(), None);
    }

    #[test]
    fn test_wildcard_mapping_is_wildcard() {
        let config = Config::parse("language: go\nlibraries:\n  - \"*\":\n").unwrap();
        assert!(config.has_wildcard());
        assert_eq!(config.named_entries().count(), 0);
    }

    #[test]
    fn test_entry_with_two_names_rejected() {
        let yaml = r#"
language: go
libraries:
  - a: {}
    b: {}
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("exactly one name"));
    }

    #[test]
    fn test_entry_with_bad_field_names_library() {
        let yaml = r#"
language: go
libraries:
  - secretmanager:
      keep: not-a-list
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("secretmanager"));
    }

    #[test]
    fn test_language_aliases() {
        assert_eq!(Config::parse("language: nodejs").unwrap().language, Language::Node);
        assert_eq!(Config::parse("language: csharp").unwrap().language, Language::Dotnet);
        assert!(Config::parse("language: cobol").is_err());
    }

    #[test]
    fn test_tag_format_default() {
        let config = Config::parse("language: go").unwrap();
        assert_eq!(config.tag_format(), "{name}/v{version}");

        let config = Config::parse("language: go\nrelease:\n  tag_format: \"v{version}\"\n").unwrap();
        assert_eq!(config.tag_format(), "v{version}");
    }

    #[test]
    fn test_packaging_defaults_by_language() {
        let rust = Config::parse("language: rust").unwrap();
        assert_eq!(rust.packaging().unwrap(), Packaging::Version);
        let go = Config::parse("language: go").unwrap();
        assert_eq!(go.packaging().unwrap(), Packaging::Service);
    }

    #[test]
    fn test_packaging_aliases_and_invalid() {
        let channel = Config::parse("language: python\ndefaults:\n  one_library_per: channel\n").unwrap();
        assert_eq!(channel.packaging().unwrap(), Packaging::Version);

        let bad = Config::parse("language: python\ndefaults:\n  one_library_per: module\n").unwrap();
        let err = bad.packaging().unwrap_err();
        assert!(matches!(err, Error::Packaging { ref value } if value == "module"));
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(
            Config::parse("  \n").unwrap_err(),
            Error::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_missing_language_rejected() {
        assert!(Config::parse("version: v1\n").is_err());
    }

    #[test]
    fn test_add_library() {
        let mut config = Config::parse("language: python").unwrap();
        let apis = vec!["google/cloud/secretmanager/v1".to_string()];

        config
            .add_library("google-cloud-secret-manager", &apis, None)
            .unwrap();
        let (name, added) = config.named_entries().next().unwrap();
        assert_eq!(name, "google-cloud-secret-manager");
        assert_eq!(added.api_paths(), apis);

        let err = config
            .add_library("google-cloud-secret-manager", &apis, None)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let more = vec![
            "google/cloud/secretmanager/v1".to_string(),
            "google/cloud/secretmanager/v1beta2".to_string(),
        ];
        config
            .add_library("google-cloud-secret-manager", &more, None)
            .unwrap();
        assert_eq!(config.libraries.len(), 2);
    }

    #[test]
    fn test_add_library_validation() {
        let mut config = Config::parse("language: go").unwrap();
        assert!(config.add_library("", &[], Some("foo")).is_err());
        assert!(config.add_library("storage", &[], None).is_err());

        config.add_library("storage", &[], Some("storage")).unwrap();
        let err = config.add_library("storage", &[], Some("other")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(config.libraries.len(), 1);
    }
}
