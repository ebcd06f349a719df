//! Default values for librarian-config.
//!
//! This module provides centralized default values used across commands and
//! the resolver, ensuring consistency and avoiding duplication.

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "librarian.yaml";

/// Publication target every generated library gets unless configured.
pub const DEFAULT_DESTINATION: &str = "PACKAGE_MANAGER";

/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Tag template for releases, e.g. `google-cloud-kms/v1.2.0`.
pub const DEFAULT_TAG_FORMAT: &str = "{name}/v{version}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_format_uses_known_placeholders() {
        assert!(DEFAULT_TAG_FORMAT.contains("{name}"));
        assert!(DEFAULT_TAG_FORMAT.contains("{version}"));
    }

    #[test]
    fn test_config_filename_is_yaml() {
        assert!(DEFAULT_CONFIG_FILENAME.ends_with(".yaml"));
    }
}
