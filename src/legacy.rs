//! # Legacy Build-File Metadata
//!
//! Older API directories carry their generation settings inside a
//! `BUILD.bazel` rule such as:
//!
//! ```text
//! py_gapic_library(
//!     name = "secretmanager_py_gapic",
//!     grpc_service_config = "secretmanager_grpc_service_config.json",
//!     opt_args = [
//!         "warehouse-package-name=google-cloud-secret-manager",
//!     ],
//!     rest_numeric_enums = True,
//!     service_yaml = "secretmanager_v1.yaml",
//!     transport = "grpc+rest",
//! )
//! ```
//!
//! The extractor finds the first invocation of the rule for the target
//! language, ending at the first closing parenthesis, and pulls attributes out
//! of it with regular expressions. Only the first invocation is read, and
//! attribute values containing `)` are not supported. Booleans are only
//! recognised as `True` or `False`; anything else is treated as absent.
//!
//! A file without the rule describes a proto-only API: the result has
//! `is_description_only` set and every other field empty. A missing or
//! malformed attribute is simply left empty.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::discovery::METADATA_FILENAME;
use crate::error::Result;
use crate::language::Language;

/// Generation settings recovered from one API's build file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyMetadata {
    pub grpc_service_config: Option<String>,
    pub service_yaml: Option<String>,
    pub transport: Option<String>,
    /// `None` when the rule does not mention the attribute.
    pub rest_numeric_enums: Option<bool>,
    pub extra_args: Vec<String>,
    /// No generation rule was found; the API only carries proto definitions.
    pub is_description_only: bool,
}

impl LegacyMetadata {
    fn description_only() -> Self {
        Self {
            is_description_only: true,
            ..Self::default()
        }
    }
}

/// The build rule that describes generation for `language`.
///
/// Rust and Dart have no rule of their own and read the Python one, which
/// every generated API carries.
pub fn rule_name(language: Language) -> &'static str {
    match language {
        Language::Go => "go_gapic_library",
        Language::Java => "java_gapic_library",
        Language::Node => "nodejs_gapic_library",
        Language::Dotnet => "csharp_gapic_library",
        Language::Python | Language::Rust | Language::Dart => "py_gapic_library",
    }
}

/// Reads the build file of `api_path` under `source_root`.
///
/// Returns `Ok(None)` when the API directory has no build file.
pub fn read_legacy_metadata(
    source_root: &Path,
    api_path: &str,
    language: Language,
) -> Result<Option<LegacyMetadata>> {
    let build_file = source_root.join(api_path).join(METADATA_FILENAME);
    if !build_file.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&build_file)?;
    parse_legacy_metadata(&content, rule_name(language)).map(Some)
}

/// Extracts metadata from the first `rule` invocation in `content`.
pub fn parse_legacy_metadata(content: &str, rule: &str) -> Result<LegacyMetadata> {
    let Some(block) = find_rule_block(content, rule)? else {
        return Ok(LegacyMetadata::description_only());
    };

    Ok(LegacyMetadata {
        grpc_service_config: extract_string(block, "grpc_service_config")?,
        service_yaml: extract_string(block, "service_yaml")?,
        transport: extract_string(block, "transport")?,
        rest_numeric_enums: extract_bool(block, "rest_numeric_enums")?,
        extra_args: extract_list(block, "opt_args")?,
        is_description_only: false,
    })
}

/// A double-quoted string item inside a list.
fn quoted_item() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("item pattern is a valid regex"))
}

fn find_rule_block<'a>(content: &'a str, rule: &str) -> Result<Option<&'a str>> {
    let regex = Regex::new(&format!(r"\b{}\s*\([^)]*\)", regex::escape(rule)))?;
    Ok(regex.find(content).map(|m| m.as_str()))
}

/// First capture group of `pattern` in `block`.
fn capture<'a>(block: &'a str, pattern: &str) -> Result<Option<&'a str>> {
    let regex = Regex::new(pattern)?;
    Ok(regex
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str()))
}

/// `key = "value"`
fn extract_string(block: &str, key: &str) -> Result<Option<String>> {
    let pattern = format!(r#"\b{}\s*=\s*"([^"]+)""#, regex::escape(key));
    Ok(capture(block, &pattern)?.map(str::to_string))
}

/// `key = True` or `key = False`
fn extract_bool(block: &str, key: &str) -> Result<Option<bool>> {
    let pattern = format!(r"\b{}\s*=\s*(True|False)\b", regex::escape(key));
    Ok(capture(block, &pattern)?.map(|value| value == "True"))
}

/// `key = ["a", "b"]`, possibly spread over several lines
fn extract_list(block: &str, key: &str) -> Result<Vec<String>> {
    let pattern = format!(r"(?s)\b{}\s*=\s*\[(.*?)\]", regex::escape(key));
    let Some(list) = capture(block, &pattern)? else {
        return Ok(Vec::new());
    };
    Ok(quoted_item()
        .captures_iter(list)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL_RULE: &str = r#"
load("@com_google_googleapis_imports//:imports.bzl", "py_gapic_library")

py_gapic_library(
    name = "secretmanager_py_gapic",
    srcs = [":secretmanager_proto"],
    grpc_service_config = "secretmanager_grpc_service_config.json",
    opt_args = [
        "warehouse-package-name=google-cloud-secret-manager",
    ],
    rest_numeric_enums = True,
    service_yaml = "secretmanager_v1.yaml",
    transport = "grpc+rest",
    deps = [
        "//google/iam/v1:iam_policy_py_proto",
    ],
)
"#;

    #[test]
    fn test_parse_full_rule() {
        let metadata = parse_legacy_metadata(FULL_RULE, "py_gapic_library").unwrap();
        assert_eq!(
            metadata,
            LegacyMetadata {
                grpc_service_config: Some("secretmanager_grpc_service_config.json".to_string()),
                service_yaml: Some("secretmanager_v1.yaml".to_string()),
                transport: Some("grpc+rest".to_string()),
                rest_numeric_enums: Some(true),
                extra_args: vec!["warehouse-package-name=google-cloud-secret-manager".to_string()],
                is_description_only: false,
            }
        );
    }

    #[test]
    fn test_proto_only_build_file() {
        let content = r#"
proto_library(
    name = "common_proto",
    srcs = ["resource.proto"],
)
"#;
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert!(metadata.is_description_only);
        assert_eq!(metadata.transport, None);
        assert!(metadata.extra_args.is_empty());
    }

    #[test]
    fn test_multiple_opt_args() {
        let content = r#"
py_gapic_library(
    name = "test_py_gapic",
    grpc_service_config = "test.json",
    opt_args = [
        "python-gapic-name=TestService",
        "python-gapic-namespace=google.cloud.test",
        "warehouse-package-name=google-cloud-test",
    ],
    transport = "grpc",
)
"#;
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(metadata.transport.as_deref(), Some("grpc"));
        assert_eq!(
            metadata.extra_args,
            vec![
                "python-gapic-name=TestService",
                "python-gapic-namespace=google.cloud.test",
                "warehouse-package-name=google-cloud-test",
            ]
        );
    }

    #[test]
    fn test_rest_numeric_enums_false_and_absent() {
        let explicit_false = r#"
py_gapic_library(
    name = "test_py_gapic",
    rest_numeric_enums = False,
    transport = "rest",
)
"#;
        let metadata = parse_legacy_metadata(explicit_false, "py_gapic_library").unwrap();
        assert_eq!(metadata.rest_numeric_enums, Some(false));
        assert_eq!(metadata.transport.as_deref(), Some("rest"));

        let absent = "py_gapic_library(\n    name = \"minimal_py_gapic\",\n)\n";
        let metadata = parse_legacy_metadata(absent, "py_gapic_library").unwrap();
        assert!(!metadata.is_description_only);
        assert_eq!(metadata, LegacyMetadata::default());
    }

    #[test]
    fn test_lowercase_booleans_are_not_recognised() {
        let content = "py_gapic_library(\n    rest_numeric_enums = true,\n)\n";
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(metadata.rest_numeric_enums, None);
    }

    #[test]
    fn test_list_items_must_be_quoted() {
        let content = r#"
py_gapic_library(
    opt_args = ["a=1", some_variable, "b=2"],
)
"#;
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(metadata.extra_args, vec!["a=1", "b=2"]);

        let again = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(again, metadata);
    }

    #[test]
    fn test_only_first_rule_is_read() {
        let content = r#"
py_gapic_library(
    name = "first",
    transport = "grpc",
)

py_gapic_library(
    name = "second",
    transport = "rest",
)
"#;
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(metadata.transport.as_deref(), Some("grpc"));
    }

    #[test]
    fn test_attributes_outside_rule_are_ignored() {
        let content = r#"
go_gapic_library(
    name = "secretmanager_go_gapic",
    transport = "grpc",
)

py_gapic_library(
    name = "secretmanager_py_gapic",
)
"#;
        let metadata = parse_legacy_metadata(content, "py_gapic_library").unwrap();
        assert_eq!(metadata.transport, None);

        let go = parse_legacy_metadata(content, rule_name(Language::Go)).unwrap();
        assert_eq!(go.transport.as_deref(), Some("grpc"));
    }

    #[test]
    fn test_rule_name_by_language() {
        assert_eq!(rule_name(Language::Python), "py_gapic_library");
        assert_eq!(rule_name(Language::Rust), "py_gapic_library");
        assert_eq!(rule_name(Language::Go), "go_gapic_library");
        assert_eq!(rule_name(Language::Dotnet), "csharp_gapic_library");
    }

    #[test]
    fn test_read_missing_build_file() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("google/pubsub/v1")).unwrap();
        let result = read_legacy_metadata(temp.path(), "google/pubsub/v1", Language::Python);
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_build_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("google/cloud/secretmanager/v1");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(METADATA_FILENAME), FULL_RULE).unwrap();

        let metadata =
            read_legacy_metadata(temp.path(), "google/cloud/secretmanager/v1", Language::Rust)
                .unwrap()
                .unwrap();
        assert_eq!(metadata.transport.as_deref(), Some("grpc+rest"));
        assert_eq!(metadata.rest_numeric_enums, Some(true));
    }
}
