//! # Resolved Libraries
//!
//! A [`Library`] is the unit handed to the generation and release tooling: a
//! name, the APIs it bundles (none for a handwritten library) and the
//! settings that apply to it.
//!
//! ## Layering
//!
//! A library starts out holding only what the configuration file says about
//! it. Supplementary sources are then applied with [`Library::fill_from`],
//! which only writes fields that are still empty. Applying the layers from
//! highest to lowest precedence therefore gives
//!
//! ```text
//! explicit config > service description > legacy build file > defaults
//! ```
//!
//! without any layer ever overwriting a value set by a higher one. An explicit
//! `false` is a value like any other.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{
    DartSettings, DotnetSettings, GoSettings, JavaSettings, LibraryConfig, NodeSettings,
    PythonSettings, RustSettings,
};
use crate::legacy::LegacyMetadata;

/// Fills empty fields of `self` from `other`.
pub trait FillEmpty {
    fn fill_empty(&mut self, other: &Self);
}

fn fill_option<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(other);
    }
}

fn fill_vec<T: Clone>(slot: &mut Vec<T>, other: &[T]) {
    if slot.is_empty() {
        slot.extend_from_slice(other);
    }
}

fn fill_map(slot: &mut BTreeMap<String, String>, other: &BTreeMap<String, String>) {
    if slot.is_empty() {
        slot.clone_from(other);
    }
}

fn fill_block<T: FillEmpty + Clone>(slot: &mut Option<T>, other: &Option<T>) {
    match (slot.as_mut(), other) {
        (Some(current), Some(other)) => current.fill_empty(other),
        (None, Some(other)) => *slot = Some(other.clone()),
        (_, None) => {}
    }
}

impl FillEmpty for PythonSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_vec(&mut self.opt_args, &other.opt_args);
        fill_option(&mut self.rest_async_io_enabled, &other.rest_async_io_enabled);
        fill_option(
            &mut self.unversioned_package_disabled,
            &other.unversioned_package_disabled,
        );
    }
}

impl FillEmpty for GoSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_option(&mut self.import_path, &other.import_path);
        fill_map(&mut self.renamed_services, &other.renamed_services);
    }
}

impl FillEmpty for JavaSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_option(&mut self.package, &other.package);
        fill_map(&mut self.service_class_names, &other.service_class_names);
    }
}

impl FillEmpty for NodeSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_vec(&mut self.selective_methods, &other.selective_methods);
    }
}

impl FillEmpty for DotnetSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_map(&mut self.renamed_services, &other.renamed_services);
        fill_map(&mut self.renamed_resources, &other.renamed_resources);
    }
}

impl FillEmpty for RustSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_option(&mut self.package_name_override, &other.package_name_override);
        fill_vec(&mut self.roots, &other.roots);
        fill_vec(&mut self.default_features, &other.default_features);
        fill_vec(&mut self.disabled_rustdoc_warnings, &other.disabled_rustdoc_warnings);
        fill_vec(&mut self.disabled_clippy_warnings, &other.disabled_clippy_warnings);
        fill_option(&mut self.not_for_publication, &other.not_for_publication);
    }
}

impl FillEmpty for DartSettings {
    fn fill_empty(&mut self, other: &Self) {
        fill_option(
            &mut self.api_keys_environment_variables,
            &other.api_keys_environment_variables,
        );
        fill_vec(&mut self.dev_dependencies, &other.dev_dependencies);
    }
}

/// Generation settings for one API of a library, recovered from its build file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateApi {
    pub path: String,
    /// Input format other than protobuf, e.g. `discovery`. Only set from
    /// explicit configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_service_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_yaml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rest_numeric_enums: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opt_args: Vec<String>,
}

impl GenerateApi {
    /// Builds the entry for `path`, or `None` for a description-only API.
    pub fn from_legacy(path: &str, metadata: &LegacyMetadata) -> Option<Self> {
        if metadata.is_description_only {
            return None;
        }
        Some(Self {
            path: path.to_string(),
            grpc_service_config: metadata.grpc_service_config.clone(),
            service_yaml: metadata.service_yaml.clone(),
            transport: metadata.transport.clone(),
            rest_numeric_enums: metadata.rest_numeric_enums.unwrap_or(false),
            opt_args: metadata.extra_args.clone(),
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generate {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<GenerateApi>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keep: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl Generate {
    pub fn is_empty(&self) -> bool {
        self.apis.is_empty() && self.keep.is_empty() && self.remove.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryRelease {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Tag of the current version, from `release.tag_format`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl LibraryRelease {
    pub fn is_empty(&self) -> bool {
        !self.disabled && self.tag.is_none()
    }
}

/// A resolved library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Library {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// API paths in configuration then discovery order. Empty for handwritten
    /// libraries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Generate::is_empty")]
    pub generate: Generate,
    #[serde(skip_serializing_if = "LibraryRelease::is_empty")]
    pub release: LibraryRelease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_numeric_enums: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_stage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PythonSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go: Option<GoSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java: Option<JavaSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotnet: Option<DotnetSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rust: Option<RustSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dart: Option<DartSettings>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A library holding exactly the values of an explicit configuration
    /// entry. APIs are supplied separately because they are filtered first.
    pub fn from_config(name: &str, config: &LibraryConfig, apis: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            version: config.version.clone(),
            apis,
            location: config.path.clone(),
            generate: Generate {
                apis: Vec::new(),
                keep: config.keep.clone(),
                remove: config.remove.clone(),
            },
            release: LibraryRelease {
                disabled: config.disabled,
                tag: None,
            },
            transport: config.transport.clone(),
            rest_numeric_enums: config.rest_numeric_enums,
            release_level: config.release_level.clone(),
            launch_stage: config.launch_stage.clone(),
            destinations: config.destinations.clone(),
            python: config.python.clone(),
            go: config.go.clone(),
            java: config.java.clone(),
            node: config.node.clone(),
            dotnet: config.dotnet.clone(),
            rust: config.rust.clone(),
            dart: config.dart.clone(),
        }
    }

    /// A library with no APIs is handwritten and is never generated.
    pub fn is_handwritten(&self) -> bool {
        self.apis.is_empty()
    }

    /// Fills every empty setting from a lower precedence `layer`.
    ///
    /// Identity fields (name, APIs, location, generate, release) are not
    /// touched.
    pub fn fill_from(&mut self, layer: &Library) {
        fill_option(&mut self.version, &layer.version);
        fill_option(&mut self.transport, &layer.transport);
        fill_option(&mut self.rest_numeric_enums, &layer.rest_numeric_enums);
        fill_option(&mut self.release_level, &layer.release_level);
        fill_option(&mut self.launch_stage, &layer.launch_stage);
        fill_vec(&mut self.destinations, &layer.destinations);
        fill_block(&mut self.python, &layer.python);
        fill_block(&mut self.go, &layer.go);
        fill_block(&mut self.java, &layer.java);
        fill_block(&mut self.node, &layer.node);
        fill_block(&mut self.dotnet, &layer.dotnet);
        fill_block(&mut self.rust, &layer.rust);
        fill_block(&mut self.dart, &layer.dart);
    }
}
