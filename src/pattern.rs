//! Inclusion and exclusion patterns for API paths.
//!
//! Four shapes are supported:
//!
//! - `google/cloud/secretmanager/v1`: exact path, or any path below it.
//!   A trailing slash is ignored, so `google/ads/` behaves like `google/ads`.
//! - `google/ads/*`: anything strictly below `google/ads/`, but not
//!   `google/ads` itself.
//! - `google/*/v1`: a single embedded wildcard, matched as a prefix plus a
//!   suffix.
//! - `*/v1`: a leading wildcard, the same prefix plus suffix check with an
//!   empty prefix.
//!
//! Patterns with more than one `*` never match. Matching never fails.

/// Returns true if `path` matches `pattern`.
///
/// # Examples
///
/// ```
/// use librarian_config::pattern::matches;
///
/// assert!(matches("google/ads/*", "google/ads/googleads/v19"));
/// assert!(!matches("google/ads/*", "google/ads"));
/// assert!(matches("google/actions", "google/actions/sdk/v2"));
/// ```
pub fn matches(pattern: &str, path: &str) -> bool {
    match pattern.matches('*').count() {
        0 => matches_directory(pattern, path),
        1 => matches_wildcard(pattern, path),
        _ => false,
    }
}

/// Returns true if `path` matches any of `patterns`.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], path: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), path))
}

fn matches_directory(pattern: &str, path: &str) -> bool {
    let prefix = pattern.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

fn matches_wildcard(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty());
    }

    let (prefix, suffix) = match pattern.split_once('*') {
        Some(parts) => parts,
        None => return false,
    };
    path.len() >= prefix.len() + suffix.len() && path.starts_with(prefix) && path.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_prefix() {
        let cases = [
            ("google/actions", "google/actions/v2", true),
            ("google/actions", "google/actions/sdk/v2", true),
            ("google/actions", "google/actions/sdk/v2/foo", true),
            ("google/actions", "google/actions", true),
            ("google/actions", "google/cloud/v1", false),
            ("google/actions", "google/action", false),
            ("google/actions", "google/actionssdk", false),
        ];
        for (pattern, path, want) in cases {
            assert_eq!(matches(pattern, path), want, "matches({:?}, {:?})", pattern, path);
        }
    }

    #[test]
    fn test_exact_match() {
        assert!(matches(
            "google/cloud/secretmanager/v1",
            "google/cloud/secretmanager/v1"
        ));
        assert!(!matches(
            "google/cloud/secretmanager/v1",
            "google/cloud/secretmanager/v2"
        ));
        assert!(!matches(
            "google/cloud/secretmanager/v1",
            "google/cloud/secretmanager/v1beta2"
        ));
    }

    #[test]
    fn test_trailing_slash() {
        assert!(matches("google/ads/", "google/ads/v1"));
        assert!(matches("google/ads/", "google/ads"));
        assert!(!matches("google/ads/", "google/adsense"));
    }

    #[test]
    fn test_suffix_wildcard() {
        assert!(matches("google/ads/*", "google/ads/googleads/v19"));
        assert!(matches("google/ads/*", "google/ads/v1"));
        assert!(!matches("google/ads/*", "google/ads"));
        assert!(!matches("google/ads/*", "google/ads/"));
        assert!(!matches("google/ads/*", "google/adsense/v1"));
    }

    #[test]
    fn test_embedded_wildcard() {
        assert!(matches("google/*/v1", "google/pubsub/v1"));
        assert!(matches("google/*/v1", "google/cloud/kms/v1"));
        assert!(!matches("google/*/v1", "google/cloud/kms/v2"));
        assert!(!matches("google/*/v1", "google/v1"));
    }

    #[test]
    fn test_leading_wildcard() {
        assert!(matches("*/v1alpha", "google/cloud/kms/v1alpha"));
        assert!(!matches("*/v1alpha", "google/cloud/kms/v1"));
    }

    #[test]
    fn test_multiple_wildcards_never_match() {
        assert!(!matches("google/*/*/v1", "google/cloud/kms/v1"));
        assert!(!matches("*/*", "google/cloud"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!matches("", "google/cloud/kms/v1"));
        assert!(!matches("/", "google/cloud/kms/v1"));
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec!["google/ads/*".to_string(), "google/actions".to_string()];
        assert!(matches_any(&patterns, "google/actions/sdk/v2"));
        assert!(matches_any(&patterns, "google/ads/googleads/v19"));
        assert!(!matches_any(&patterns, "google/cloud/kms/v1"));
        assert!(!matches_any::<String>(&[], "google/cloud/kms/v1"));
    }
}
