//! # Exclusion and Override Table
//!
//! A small data table, distributed with the tool, that tells discovery which
//! API paths to skip and which service description file to use for APIs that
//! do not follow the `<service>_<version>.yaml` naming convention.
//!
//! Two document shapes have been used over time and both are accepted:
//!
//! ```yaml
//! # Flat: one exclusion list for every language
//! service_configs:
//!   google/spanner/admin/database/v1: spanner.yaml
//! exclude_apis:
//!   - google/ads/*
//! ```
//!
//! ```yaml
//! # Language scoped
//! service_configs:
//!   google/spanner/admin/database/v1: spanner.yaml
//! excluded_apis:
//!   all:
//!     - google/ads/*
//!   python:
//!     - google/cloud/bigquery/logging/v1
//! ```
//!
//! A document that uses both `exclude_apis` and `excluded_apis` is rejected.
//!
//! The table is a plain value. [`Overrides::builtin`] parses the embedded
//! copy once per process; callers and tests that want a different table
//! construct one with [`Overrides::parse`] and pass it explicitly.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::language::Language;
use crate::pattern;

const BUILTIN_OVERRIDES: &str = include_str!("../data/service_config_overrides.yaml");

/// Key of the language-agnostic list in the scoped schema.
const ALL_LANGUAGES: &str = "all";

/// Which document shape a table was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverridesSchema {
    /// A single `exclude_apis` list.
    #[default]
    Flat,
    /// `excluded_apis` keyed by `all` and language names.
    LanguageScoped,
}

#[derive(Debug, Default, Deserialize)]
struct RawOverrides {
    #[serde(default)]
    service_configs: BTreeMap<String, String>,
    #[serde(default)]
    exclude_apis: Option<Vec<String>>,
    #[serde(default)]
    excluded_apis: Option<BTreeMap<String, Vec<String>>>,
}

/// Service description overrides and exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    schema: OverridesSchema,
    service_configs: BTreeMap<String, String>,
    excluded_all: Vec<String>,
    excluded_by_language: BTreeMap<String, Vec<String>>,
}

impl Overrides {
    /// Parses an override table in either schema.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawOverrides = serde_yaml::from_str(yaml_content)?;

        match (raw.exclude_apis, raw.excluded_apis) {
            (Some(_), Some(_)) => Err(Error::ConfigParse {
                message: "override table sets both exclude_apis and excluded_apis".to_string(),
                hint: Some(
                    "Use exclude_apis for a flat list or excluded_apis for per-language lists"
                        .to_string(),
                ),
            }),
            (Some(flat), None) => Ok(Self {
                schema: OverridesSchema::Flat,
                service_configs: raw.service_configs,
                excluded_all: flat,
                excluded_by_language: BTreeMap::new(),
            }),
            (None, Some(mut scoped)) => {
                let excluded_all = scoped.remove(ALL_LANGUAGES).unwrap_or_default();
                Ok(Self {
                    schema: OverridesSchema::LanguageScoped,
                    service_configs: raw.service_configs,
                    excluded_all,
                    excluded_by_language: scoped,
                })
            }
            (None, None) => Ok(Self {
                schema: OverridesSchema::Flat,
                service_configs: raw.service_configs,
                ..Self::default()
            }),
        }
    }

    /// Reads an override table from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The table shipped with the tool, parsed on first use.
    ///
    /// If the embedded document cannot be parsed an empty table is used and a
    /// warning is logged.
    pub fn builtin() -> &'static Overrides {
        static BUILTIN: OnceLock<Overrides> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Overrides::parse(BUILTIN_OVERRIDES).unwrap_or_else(|e| {
                log::warn!("ignoring built-in service config overrides: {}", e);
                Overrides::default()
            })
        })
    }

    pub fn schema(&self) -> OverridesSchema {
        self.schema
    }

    /// Returns true if `path` is excluded for every language or for `language`.
    pub fn is_excluded(&self, language: Language, path: &str) -> bool {
        if pattern::matches_any(self.excluded_all.as_slice(), path) {
            return true;
        }
        self.excluded_by_language
            .get(language.as_str())
            .is_some_and(|patterns| pattern::matches_any(patterns.as_slice(), path))
    }

    /// The service description filename configured for `path`, if any.
    pub fn service_config(&self, path: &str) -> Option<&str> {
        self.service_configs.get(path).map(String::as_str)
    }
}
