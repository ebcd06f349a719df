//! # Service Description Extraction
//!
//! Each API directory usually carries a service description, a YAML document
//! such as `secretmanager_v1.yaml`, whose `publishing.library_settings` block
//! holds per-language publishing overrides:
//!
//! ```yaml
//! type: google.api.Service
//! name: secretmanager.googleapis.com
//! publishing:
//!   library_settings:
//!   - version: google.cloud.secretmanager.v1
//!     java_settings:
//!       library_package: com.google.cloud.secretmanager.v1
//!     dotnet_settings:
//!       renamed_services:
//!         SecretManagerService: SecretManager
//! ```
//!
//! ## Locating the file
//!
//! For an API path `.../<service>/<version>` the first match wins:
//!
//! 1. the filename configured in the override table, if it exists;
//! 2. `<service>_<version>.yaml`;
//! 3. `<service>.yaml`;
//! 4. the only `*_<version>.yaml` in the directory, ignoring `*_gapic.yaml`.
//!
//! Only the first `library_settings` entry is consulted. Keys may be written in
//! `snake_case` or `camelCase`; unknown keys are ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{DotnetSettings, GoSettings, JavaSettings, NodeSettings, PythonSettings};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::overrides::Overrides;

/// The subset of a service description this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceDescription {
    pub name: String,
    pub title: String,
    pub publishing: Publishing,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Publishing {
    #[serde(alias = "librarySettings")]
    pub library_settings: Vec<ClientLibrarySettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientLibrarySettings {
    pub version: String,
    #[serde(alias = "javaSettings")]
    pub java_settings: Option<JavaPublishing>,
    #[serde(alias = "pythonSettings")]
    pub python_settings: Option<PythonPublishing>,
    #[serde(alias = "goSettings")]
    pub go_settings: Option<RenamingPublishing>,
    #[serde(alias = "nodeSettings")]
    pub node_settings: Option<NodePublishing>,
    #[serde(alias = "dotnetSettings")]
    pub dotnet_settings: Option<RenamingPublishing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JavaPublishing {
    #[serde(alias = "libraryPackage")]
    pub library_package: String,
    #[serde(alias = "serviceClassNames")]
    pub service_class_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PythonPublishing {
    #[serde(alias = "experimentalFeatures")]
    pub experimental_features: ExperimentalFeatures,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperimentalFeatures {
    #[serde(alias = "restAsyncIoEnabled")]
    pub rest_async_io_enabled: bool,
    #[serde(alias = "unversionedPackageDisabled")]
    pub unversioned_package_disabled: bool,
}

/// Go and .NET settings both carry renaming tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenamingPublishing {
    #[serde(alias = "renamedServices")]
    pub renamed_services: BTreeMap<String, String>,
    #[serde(alias = "renamedResources")]
    pub renamed_resources: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodePublishing {
    pub common: CommonPublishing,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommonPublishing {
    #[serde(alias = "selectiveGapicGeneration")]
    pub selective_gapic_generation: SelectiveGeneration,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectiveGeneration {
    pub methods: Vec<String>,
}

impl ServiceDescription {
    pub fn parse(yaml_content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Reads a service description, reporting parse failures with the path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::ServiceDescription {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Publishing overrides extracted for one language.
///
/// Exactly one field is set, matching the language asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptionSettings {
    pub java: Option<JavaSettings>,
    pub python: Option<PythonSettings>,
    pub go: Option<GoSettings>,
    pub node: Option<NodeSettings>,
    pub dotnet: Option<DotnetSettings>,
}

impl ServiceDescriptionSettings {
    pub fn is_empty(&self) -> bool {
        self.java.is_none()
            && self.python.is_none()
            && self.go.is_none()
            && self.node.is_none()
            && self.dotnet.is_none()
    }

    /// Pulls `language`'s block out of the first library settings entry.
    pub fn from_description(description: &ServiceDescription, language: Language) -> Self {
        let mut settings = Self::default();
        let Some(first) = description.publishing.library_settings.first() else {
            return settings;
        };

        match language {
            Language::Java => {
                settings.java = first
                    .java_settings
                    .as_ref()
                    .map(|java| JavaSettings {
                        package: Some(java.library_package.clone()).filter(|p| !p.is_empty()),
                        service_class_names: java.service_class_names.clone(),
                    })
                    .filter(|java| *java != JavaSettings::default());
            }
            Language::Python => {
                settings.python = first
                    .python_settings
                    .as_ref()
                    .map(|python| PythonSettings {
                        rest_async_io_enabled: python
                            .experimental_features
                            .rest_async_io_enabled
                            .then_some(true),
                        unversioned_package_disabled: python
                            .experimental_features
                            .unversioned_package_disabled
                            .then_some(true),
                        ..PythonSettings::default()
                    })
                    .filter(|python| *python != PythonSettings::default());
            }
            Language::Go => {
                settings.go = first
                    .go_settings
                    .as_ref()
                    .map(|go| GoSettings {
                        renamed_services: go.renamed_services.clone(),
                        ..GoSettings::default()
                    })
                    .filter(|go| *go != GoSettings::default());
            }
            Language::Node => {
                settings.node = first
                    .node_settings
                    .as_ref()
                    .map(|node| NodeSettings {
                        selective_methods: node.common.selective_gapic_generation.methods.clone(),
                    })
                    .filter(|node| *node != NodeSettings::default());
            }
            Language::Dotnet => {
                settings.dotnet = first
                    .dotnet_settings
                    .as_ref()
                    .map(|dotnet| DotnetSettings {
                        renamed_services: dotnet.renamed_services.clone(),
                        renamed_resources: dotnet.renamed_resources.clone(),
                    })
                    .filter(|dotnet| *dotnet != DotnetSettings::default());
            }
            Language::Rust | Language::Dart => {}
        }
        settings
    }
}

/// Finds the service description for `api_path`, if there is one.
pub fn find_service_description(
    source_root: &Path,
    api_path: &str,
    overrides: &Overrides,
) -> Result<Option<PathBuf>> {
    let dir = source_root.join(api_path);

    if let Some(filename) = overrides.service_config(api_path) {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
        log::debug!(
            "service config override {} for {} does not exist",
            candidate.display(),
            api_path
        );
    }

    let parts: Vec<&str> = api_path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() < 2 {
        return Ok(None);
    }
    let service = parts[parts.len() - 2];
    let version = parts[parts.len() - 1];

    for filename in [
        format!("{}_{}.yaml", service, version),
        format!("{}.yaml", service),
    ] {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }

    let pattern = format!(
        "{}/*_{}.yaml",
        glob::Pattern::escape(&dir.to_string_lossy()),
        version
    );
    let candidates: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| !name.ends_with("_gapic.yaml"))
        })
        .collect();

    match <[PathBuf; 1]>::try_from(candidates) {
        Ok([only]) => Ok(Some(only)),
        Err(candidates) => {
            if candidates.len() > 1 {
                log::debug!(
                    "{} candidate service descriptions in {}, using none",
                    candidates.len(),
                    dir.display()
                );
            }
            Ok(None)
        }
    }
}

/// Extracts `language`'s publishing settings for `api_path`.
///
/// Returns `Ok(None)` when there is no service description or it has nothing
/// for the language.
pub fn extract_settings(
    source_root: &Path,
    api_path: &str,
    language: Language,
    overrides: &Overrides,
) -> Result<Option<ServiceDescriptionSettings>> {
    let Some(path) = find_service_description(source_root, api_path, overrides)? else {
        return Ok(None);
    };
    let description = ServiceDescription::from_file(&path)?;
    let settings = ServiceDescriptionSettings::from_description(&description, language);
    if settings.is_empty() {
        return Ok(None);
    }
    Ok(Some(settings))
}
