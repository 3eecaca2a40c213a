//! Path key normalization
//!
//! Services disagree on whether their fragments carry their own name as the
//! first path segment (`/db/_table` vs `/_table`). These helpers derive the
//! resource path used for permission lookups and decide whether the aggregate
//! document must prepend `/{service}` to a fragment's keys.

/// Normalizes path keys contributed by one service
pub struct PathNormalizer;

impl PathNormalizer {
    /// Resource portion of a path key, used as the permission-lookup key
    ///
    /// A leading `/{service_name}` segment (case-insensitive) is stripped, then
    /// any leading `/` is trimmed.
    ///
    /// # Examples
    /// ```
    /// use apidoc_aggregator_compose::PathNormalizer;
    ///
    /// assert_eq!(PathNormalizer::resource_path("db", "/db/_table"), "_table");
    /// assert_eq!(PathNormalizer::resource_path("db", "/DB"), "");
    /// assert_eq!(PathNormalizer::resource_path("db", "/_schema/{name}"), "_schema/{name}");
    /// ```
    pub fn resource_path(service_name: &str, raw_path: &str) -> String {
        if let Some(rest) = Self::strip_service_segment(service_name, raw_path) {
            return rest.trim_start_matches('/').to_string();
        }
        raw_path.trim_start_matches('/').to_string()
    }

    /// True if any key's first segment is not the service name
    ///
    /// Such a fragment is "unprefixed": every one of its keys gets
    /// `/{service_name}` prepended in a whole-system document.
    ///
    /// # Examples
    /// ```
    /// use apidoc_aggregator_compose::PathNormalizer;
    ///
    /// assert!(!PathNormalizer::needs_service_name_prefix("db", ["/db", "/db/_table"]));
    /// assert!(PathNormalizer::needs_service_name_prefix("db", ["/", "/_table"]));
    /// ```
    pub fn needs_service_name_prefix<I, S>(service_name: &str, raw_paths: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw_paths
            .into_iter()
            .any(|path| !Self::first_segment(path.as_ref()).eq_ignore_ascii_case(service_name))
    }

    /// Path key with `/{service_name}` prepended
    ///
    /// The root key `/` maps to `/{service_name}` rather than `/{service_name}/`.
    pub fn with_service_prefix(service_name: &str, raw_path: &str) -> String {
        let rest = raw_path.trim_start_matches('/');
        if rest.is_empty() {
            format!("/{}", service_name)
        } else {
            format!("/{}/{}", service_name, rest)
        }
    }

    /// First slash-delimited segment, ignoring leading slashes
    fn first_segment(raw_path: &str) -> &str {
        raw_path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
    }

    /// Remainder after a leading `/{service_name}` segment, if present
    fn strip_service_segment<'a>(service_name: &str, raw_path: &'a str) -> Option<&'a str> {
        let without_slash = raw_path.strip_prefix('/')?;
        let (first, rest) = match without_slash.split_once('/') {
            Some((first, rest)) => (first, rest),
            None => (without_slash, ""),
        };
        if first.eq_ignore_ascii_case(service_name) {
            Some(rest)
        } else {
            None
        }
    }
}
