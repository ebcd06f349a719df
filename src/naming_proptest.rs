//! Property-based tests for naming and pattern matching.
//!
//! These tests use proptest to generate API paths and verify that the naming
//! conventions and exclusion patterns hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::language::{Language, Packaging};
    use crate::naming::{derive_api_path, derive_library_name, is_version_segment, parse_api_path};
    use crate::pattern::matches;
    use proptest::prelude::*;

    /// A non-version segment that is never the `google` root.
    fn segment() -> impl Strategy<Value = String> {
        "[a-fh-uw-z][a-z0-9]{0,8}"
    }

    fn version() -> impl Strategy<Value = String> {
        "v[1-9][0-9]?((alpha|beta)[0-9]?)?"
    }

    /// `[google/]<segments>/<version>`
    fn api_path() -> impl Strategy<Value = String> {
        (
            any::<bool>(),
            prop::collection::vec(segment(), 1..4),
            version(),
        )
            .prop_map(|(rooted, segments, version)| {
                let mut parts = Vec::new();
                if rooted {
                    parts.push("google".to_string());
                }
                parts.extend(segments);
                parts.push(version);
                parts.join("/")
            })
    }

    fn joined_language() -> impl Strategy<Value = Language> {
        prop_oneof![
            Just(Language::Python),
            Just(Language::Rust),
            Just(Language::Dart),
        ]
    }

    // ============================================================================
    // naming property tests
    // ============================================================================

    proptest! {
        /// Property: version packaged names convert back to the path they came from
        #[test]
        fn version_names_round_trip(path in api_path(), language in joined_language()) {
            let name = derive_library_name(&path, language, Packaging::Version);
            let back = derive_api_path(&name, Packaging::Version);
            prop_assert_eq!(back.ok(), Some(path));
        }

        /// Property: service packaged names never carry the version
        #[test]
        fn service_names_drop_version(path in api_path(), language in joined_language()) {
            let version = parse_api_path(&path).version;
            let name = derive_library_name(&path, language, Packaging::Service);
            let separator = if language == Language::Dart { '_' } else { '-' };
            let last = name.rsplit(separator).next().unwrap_or_default();
            prop_assert_ne!(last, version.as_str());
        }

        /// Property: the parsed version is always a version segment
        #[test]
        fn parsed_version_is_version_segment(path in api_path()) {
            let identity = parse_api_path(&path);
            prop_assert!(is_version_segment(&identity.version));
            prop_assert!(!identity.service.is_empty());
        }

        /// Property: generated versions are accepted
        #[test]
        fn generated_versions_are_detected(version in version()) {
            prop_assert!(is_version_segment(&version));
        }
    }

    // ============================================================================
    // pattern property tests
    // ============================================================================

    proptest! {
        /// Property: a plain pattern matches itself and everything below it
        #[test]
        fn directory_pattern_covers_subtree(path in api_path(), child in segment()) {
            prop_assert!(matches(&path, &path));
            let below = format!("{}/{}", path, child);
            prop_assert!(matches(&path, &below));
        }

        /// Property: a plain pattern does not match a sibling sharing its prefix
        #[test]
        fn directory_pattern_respects_segment_boundary(path in api_path(), suffix in "[a-z0-9]{1,4}") {
            let sibling = format!("{}{}", path, suffix);
            prop_assert!(!matches(&path, &sibling));
        }

        /// Property: `prefix/*` matches below the prefix but never the prefix itself
        #[test]
        fn suffix_wildcard_excludes_prefix(path in api_path(), child in segment()) {
            let pattern = format!("{}/*", path);
            prop_assert!(!matches(&pattern, &path));
            let below = format!("{}/{}", path, child);
            prop_assert!(matches(&pattern, &below));
        }
    }
}
