//! # Library Resolution
//!
//! Turns a configuration and a source tree into the final, name-sorted list of
//! [`Library`] values. Resolution runs in one pass:
//!
//! 1. **Collect** the named entries of the configuration. Their APIs are
//!    filtered through the exclusion table and `defaults.exclude_apis`, and
//!    every configured path is claimed so discovery will not offer it again.
//! 2. **Discover** every versioned API under the source root, if the
//!    configuration contains the `"*"` entry, and drop claimed and excluded
//!    paths.
//! 3. **Name and group** the remaining APIs. Under `version` packaging every
//!    API becomes its own library; under `service` packaging APIs that derive
//!    the same library name share one library, in discovery order, provided
//!    they also share a service identity (namespace and service). An API whose
//!    name is already taken by another service is skipped with a warning.
//! 4. **Enrich** each generated library from its first API's service
//!    description and build file, then from the repository defaults. Values
//!    are only ever written into empty fields, so explicit configuration
//!    always wins.
//!
//! Missing or malformed service descriptions and build files only cost the
//! settings they would have contributed. An unreadable source root, an
//! unknown packaging policy, invalid library definitions and failed template
//! expansion abort resolution.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::Path;

use crate::config::{Config, LibraryConfig, PythonSettings};
use crate::defaults::DEFAULT_DESTINATION;
use crate::discovery::discover_apis;
use crate::error::{Error, Result};
use crate::language::{Language, Packaging};
use crate::legacy::{read_legacy_metadata, LegacyMetadata};
use crate::library::{GenerateApi, Library};
use crate::naming::{derive_api_path, derive_library_name, parse_api_path};
use crate::overrides::Overrides;
use crate::pattern;
use crate::service_config::{extract_settings, ServiceDescriptionSettings};
use crate::template::{generated_location, release_tag};

/// Resolves libraries using the built-in exclusion and override table.
pub fn resolve_libraries(source_root: &Path, config: &Config) -> Result<Vec<Library>> {
    resolve_libraries_with(source_root, config, Overrides::builtin())
}

/// Resolves libraries using an explicitly supplied exclusion and override
/// table.
pub fn resolve_libraries_with(
    source_root: &Path,
    config: &Config,
    overrides: &Overrides,
) -> Result<Vec<Library>> {
    Resolver::new(source_root, config, overrides)?.run()
}

/// Launch stage implied by the version segment of `api_path`.
pub fn derive_launch_stage(api_path: &str) -> &'static str {
    let version = parse_api_path(api_path).version;
    if version.contains("alpha") {
        "ALPHA"
    } else if version.contains("beta") {
        "BETA"
    } else {
        "GA"
    }
}

fn check_source_root(root: &Path) -> Result<()> {
    let metadata = std::fs::metadata(root).map_err(|source| Error::SourceRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::SourceRoot {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(())
}

struct Resolver<'a> {
    source_root: &'a Path,
    config: &'a Config,
    overrides: &'a Overrides,
    language: Language,
    packaging: Packaging,
    /// Non-protobuf input formats of explicitly configured APIs.
    specification_formats: HashMap<String, String>,
}

impl<'a> Resolver<'a> {
    fn new(source_root: &'a Path, config: &'a Config, overrides: &'a Overrides) -> Result<Self> {
        let packaging = config.packaging()?;
        check_source_root(source_root)?;

        let specification_formats = config
            .named_entries()
            .flat_map(|(_, entry)| entry.api.iter().chain(entry.apis.iter()))
            .filter_map(|api| {
                api.specification_format()
                    .map(|format| (api.path().to_string(), format.to_string()))
            })
            .collect();

        Ok(Self {
            source_root,
            config,
            overrides,
            language: config.language,
            packaging,
            specification_formats,
        })
    }

    fn run(&self) -> Result<Vec<Library>> {
        let mut libraries = BTreeMap::new();
        let mut claimed = HashSet::new();

        self.collect_explicit(&mut libraries, &mut claimed)?;
        if self.config.has_wildcard() {
            self.collect_discovered(&mut libraries, &claimed)?;
        }

        let mut resolved = Vec::with_capacity(libraries.len());
        for (_, mut library) in libraries {
            self.check_packaging(&library)?;
            self.enrich(&mut library)?;
            library.release.tag = release_tag(self.config.tag_format(), &library);
            resolved.push(library);
        }

        log::info!(
            "resolved {} libraries ({} handwritten) for {} with {} packaging",
            resolved.len(),
            resolved.iter().filter(|l| l.is_handwritten()).count(),
            self.language,
            self.packaging
        );
        Ok(resolved)
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.overrides.is_excluded(self.language, path)
            || pattern::matches_any(self.config.exclude_patterns(), path)
    }

    fn collect_explicit(
        &self,
        libraries: &mut BTreeMap<String, Library>,
        claimed: &mut HashSet<String>,
    ) -> Result<()> {
        let mut seen: HashSet<(&str, Vec<String>)> = HashSet::new();

        for (name, entry) in self.config.named_entries() {
            let configured = entry.api_paths();
            if !seen.insert((name, configured.clone())) {
                return Err(Error::Validation {
                    library: name.to_string(),
                    message: format!("listed more than once with APIs {:?}", configured),
                });
            }
            claimed.extend(configured.iter().cloned());

            let mut apis = self.filter_explicit(name, &configured);
            if !configured.is_empty() && apis.is_empty() {
                return Err(Error::Validation {
                    library: name.to_string(),
                    message: format!("every configured API is excluded: {:?}", configured),
                });
            }
            if configured.is_empty() {
                if let Some(path) = self.api_from_name(name, entry) {
                    claimed.insert(path.clone());
                    apis.push(path);
                }
            }

            match libraries.entry(name.to_string()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(Library::from_config(name, entry, apis));
                }
                Entry::Occupied(occupied) => {
                    let existing = occupied.into_mut();
                    existing.apis.extend(apis);
                    existing.fill_from(&Library::from_config(name, entry, Vec::new()));
                }
            }
        }
        Ok(())
    }

    fn filter_explicit(&self, name: &str, configured: &[String]) -> Vec<String> {
        configured
            .iter()
            .filter(|path| {
                let excluded = self.is_excluded(path);
                if excluded {
                    log::warn!("library {}: dropping excluded API {}", name, path);
                }
                !excluded
            })
            .cloned()
            .collect()
    }

    /// Under `version` packaging a name-only entry is its API path in
    /// disguise, provided that directory exists.
    fn api_from_name(&self, name: &str, entry: &LibraryConfig) -> Option<String> {
        if self.packaging != Packaging::Version || entry.path.is_some() {
            return None;
        }
        let path = derive_api_path(name, self.packaging).ok()?;
        if !self.source_root.join(&path).is_dir() {
            log::debug!("library {}: no API directory {}, treating as handwritten", name, path);
            return None;
        }
        if self.is_excluded(&path) {
            log::warn!("library {}: dropping excluded API {}", name, path);
            return None;
        }
        Some(path)
    }

    fn collect_discovered(
        &self,
        libraries: &mut BTreeMap<String, Library>,
        claimed: &HashSet<String>,
    ) -> Result<()> {
        for api in discover_apis(self.source_root)? {
            if claimed.contains(&api.path) {
                log::debug!("{} is configured explicitly", api.path);
                continue;
            }
            if self.is_excluded(&api.path) {
                log::debug!("{} is excluded", api.path);
                continue;
            }

            let name = derive_library_name(&api.path, self.language, self.packaging);
            if name.is_empty() {
                continue;
            }

            match libraries.get_mut(&name) {
                Some(existing) => {
                    if self.packaging == Packaging::Version || existing.is_handwritten() {
                        log::warn!(
                            "discovered API {} not added: library {} is already configured",
                            api.path,
                            name
                        );
                        continue;
                    }
                    let key = parse_api_path(&api.path).service_key();
                    let existing_key = parse_api_path(&existing.apis[0]).service_key();
                    if key != existing_key {
                        log::warn!(
                            "discovered API {} not added: library {} already holds service {} ({})",
                            api.path,
                            name,
                            existing_key,
                            existing.apis[0]
                        );
                        continue;
                    }
                    existing.apis.push(api.path);
                }
                None => {
                    let mut library = Library::new(name.clone());
                    library.apis.push(api.path);
                    libraries.insert(name, library);
                }
            }
        }
        Ok(())
    }

    fn check_packaging(&self, library: &Library) -> Result<()> {
        if self.packaging == Packaging::Version && library.apis.len() > 1 {
            return Err(Error::Validation {
                library: library.name.clone(),
                message: format!(
                    "version packaging allows one API per library, found {}: {:?}",
                    library.apis.len(),
                    library.apis
                ),
            });
        }
        Ok(())
    }

    fn enrich(&self, library: &mut Library) -> Result<()> {
        let output = self.config.defaults.as_ref().and_then(|d| d.output.as_deref());
        if library.is_handwritten() {
            self.locate_handwritten(library, output);
            return Ok(());
        }

        let mut first_metadata = None;
        for (index, path) in library.apis.iter().enumerate() {
            let metadata = match read_legacy_metadata(self.source_root, path, self.language) {
                Ok(Some(metadata)) => Some(metadata),
                Ok(None) => {
                    log::debug!("{}: no build file", path);
                    None
                }
                Err(e) => {
                    log::debug!("{}: skipping build file: {}", path, e);
                    None
                }
            };

            let format = self.specification_formats.get(path).cloned();
            let entry = match metadata.as_ref().and_then(|m| GenerateApi::from_legacy(path, m)) {
                Some(api) => Some(api),
                None if format.is_some() => Some(GenerateApi {
                    path: path.clone(),
                    ..GenerateApi::default()
                }),
                None => {
                    if metadata.is_some() {
                        log::debug!("{}: build file has no generation rule", path);
                    }
                    None
                }
            };
            if let Some(mut api) = entry {
                api.specification_format = format;
                library.generate.apis.push(api);
            }

            if index == 0 {
                first_metadata = metadata;
            }
        }

        let first = library.apis[0].clone();
        if let Some(layer) = self.service_description_layer(&first) {
            library.fill_from(&layer);
        }
        if let Some(metadata) = &first_metadata {
            library.fill_from(&self.legacy_layer(metadata));
        }
        library.fill_from(&self.defaults_layer(&first));

        library.location = generated_location(library, output)?;
        Ok(())
    }

    /// A handwritten library has no API to put into `{api.path}`, so such a
    /// template leaves it without a location.
    fn locate_handwritten(&self, library: &mut Library, output: Option<&str>) {
        match generated_location(library, output) {
            Ok(location) => library.location = location,
            Err(e) => log::debug!("library {}: no location: {}", library.name, e),
        }
    }

    fn service_description_layer(&self, api_path: &str) -> Option<Library> {
        let settings =
            match extract_settings(self.source_root, api_path, self.language, self.overrides) {
                Ok(Some(settings)) => settings,
                Ok(None) => {
                    log::debug!("{}: no service description settings", api_path);
                    return None;
                }
                Err(e) => {
                    log::debug!("{}: skipping service description: {}", api_path, e);
                    return None;
                }
            };

        let ServiceDescriptionSettings {
            java,
            python,
            go,
            node,
            dotnet,
        } = settings;
        Some(Library {
            java,
            python,
            go,
            node,
            dotnet,
            ..Library::default()
        })
    }

    fn legacy_layer(&self, metadata: &LegacyMetadata) -> Library {
        let mut layer = Library::default();
        if metadata.is_description_only {
            return layer;
        }
        layer.transport = metadata.transport.clone();
        layer.rest_numeric_enums = metadata.rest_numeric_enums;
        if self.language == Language::Python && !metadata.extra_args.is_empty() {
            layer.python = Some(PythonSettings {
                opt_args: metadata.extra_args.clone(),
                ..PythonSettings::default()
            });
        }
        layer
    }

    fn defaults_layer(&self, first_api: &str) -> Library {
        let mut layer = Library::default();
        if let Some(defaults) = &self.config.defaults {
            layer.transport = defaults.transport.clone();
            layer.rest_numeric_enums = defaults.rest_numeric_enums;
            layer.release_level = defaults.release_level.clone();
        }
        layer.launch_stage = Some(derive_launch_stage(first_api).to_string());
        layer.destinations = vec![DEFAULT_DESTINATION.to_string()];
        layer
    }
}
