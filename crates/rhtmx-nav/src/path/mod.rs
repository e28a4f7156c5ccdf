//! Path utilities shared by route lookup, breadcrumbs and history
//!
//! All functions are pure and borrow from their input where they can.

use std::borrow::Cow;

pub mod prefixes;
pub use prefixes::PathPrefixes;

/// Checks whether a path is already canonical
///
/// Canonical means: starts with `/`, has no empty segments, no backslashes,
/// no query or fragment, and no trailing `/` (except the root itself).
///
/// ```
/// use rhtmx_nav::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/user/posts/42"));
/// assert!(!is_canonical("user/posts"));
/// assert!(!is_canonical("/user/"));
/// assert!(!is_canonical("/posts?page=2"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    path.starts_with('/')
        && !path.ends_with('/')
        && !path.contains("//")
        && !path.contains(['\\', '?', '#'])
}

/// Brings a path into canonical form
///
/// Drops any `?query` / `#fragment` suffix, turns backslashes into slashes
/// and collapses empty segments. Canonical input is returned borrowed.
///
/// ```
/// use rhtmx_nav::path::normalize_path;
///
/// assert_eq!(normalize_path("/admin/users/"), "/admin/users");
/// assert_eq!(normalize_path("admin//users?tab=2"), "/admin/users");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let without_suffix = path.split(['?', '#']).next().unwrap_or_default();
    let joined = without_suffix
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", joined))
    }
}

/// Non-empty segments of a path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
