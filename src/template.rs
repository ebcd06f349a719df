//! Output path templates.
//!
//! `defaults.output` may reference two placeholders:
//!
//! - `{name}`: the library name.
//! - `{api.path}`: the library's API path. Only valid for a library with
//!   exactly one API; anything else is refused rather than guessed.
//!
//! Unknown placeholders are left as they are. Release tags use `{name}` and
//! `{version}` instead, see [`release_tag`].

use crate::error::{Error, Result};
use crate::library::Library;

const NAME: &str = "{name}";
const API_PATH: &str = "{api.path}";
const VERSION: &str = "{version}";

/// Expands `template` for `library`.
///
/// # Examples
///
/// ```
/// use librarian_config::library::Library;
/// use librarian_config::template::expand_template;
///
/// let mut library = Library::new("google-cloud-kms-v1");
/// library.apis.push("google/cloud/kms/v1".to_string());
///
/// assert_eq!(
///     expand_template("src/generated/{api.path}", &library).unwrap(),
///     "src/generated/google/cloud/kms/v1"
/// );
/// ```
pub fn expand_template(template: &str, library: &Library) -> Result<String> {
    let mut result = template.replace(NAME, &library.name);

    if result.contains(API_PATH) {
        let [api] = library.apis.as_slice() else {
            return Err(Error::Template {
                message: format!(
                    "library {:?} has {} APIs, {} needs exactly one",
                    library.name,
                    library.apis.len(),
                    API_PATH
                ),
                variable: Some("api.path".to_string()),
            });
        };
        result = result.replace(API_PATH, api);
    }

    Ok(result)
}

/// The release tag of `library`'s current version, e.g. `kms/v1.2.0` for the
/// format `{name}/v{version}`. `None` for a library without a version.
pub fn release_tag(format: &str, library: &Library) -> Option<String> {
    let version = library.version.as_deref()?;
    Some(format.replace(NAME, &library.name).replace(VERSION, version))
}

/// Where `library` lives: its explicit location, else `output` expanded for
/// it, else nowhere.
pub fn generated_location(library: &Library, output: Option<&str>) -> Result<Option<String>> {
    if let Some(location) = &library.location {
        return Ok(Some(location.clone()));
    }
    output
        .map(|template| expand_template(template, library))
        .transpose()
}
