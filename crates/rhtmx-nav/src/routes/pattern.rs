//! Route patterns: fixed paths and `:placeholder` templates
//!
//! A pattern is parsed once into typed segments. Path generation and path
//! matching both walk those segments, so the two stay in agreement.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::Params;

/// Marker that opens a placeholder segment (`/posts/:postId`)
pub const PLACEHOLDER_MARKER: char = ':';

/// One segment of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Passed through verbatim
    Static(String),
    /// Substituted from params by name
    Placeholder(String),
}

/// Errors raised while parsing a pattern
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("route pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("route pattern '{0}' contains a placeholder without a name")]
    UnnamedPlaceholder(String),

    #[error("route pattern '{pattern}' declares ':{name}' more than once")]
    DuplicatePlaceholder { pattern: String, name: String },
}

/// A parsed route pattern
///
/// ```
/// use rhtmx_nav::routes::RoutePattern;
/// use std::collections::BTreeMap;
///
/// let pattern: RoutePattern = "/user/posts/:postId/comments/:commentId".parse().unwrap();
/// assert!(pattern.is_dynamic());
///
/// let params = BTreeMap::from([
///     ("postId".to_string(), "p1".to_string()),
///     ("commentId".to_string(), "c9".to_string()),
/// ]);
/// assert_eq!(pattern.generate(&params).unwrap(), "/user/posts/p1/comments/c9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        }

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|s| !s.is_empty()) {
            match part.strip_prefix(PLACEHOLDER_MARKER) {
                Some("") => return Err(PatternError::UnnamedPlaceholder(raw.to_string())),
                Some(name) => {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Placeholder(n) if n == name))
                    {
                        return Err(PatternError::DuplicatePlaceholder {
                            pattern: raw.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as written; also the key of its validation rule set
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in pattern order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub fn is_dynamic(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Placeholders that `params` leaves unbound or binds to an empty string
    pub fn missing_params(&self, params: &Params) -> Vec<String> {
        self.placeholders()
            .filter(|name| params.get(*name).map_or(true, |v| v.is_empty()))
            .map(str::to_string)
            .collect()
    }

    /// Placeholders whose value would span more than one path segment
    pub fn multi_segment_params(&self, params: &Params) -> Vec<String> {
        self.placeholders()
            .filter(|name| params.get(*name).is_some_and(|v| v.contains('/')))
            .map(str::to_string)
            .collect()
    }

    /// Substitutes every placeholder from `params`.
    ///
    /// Values are percent-encoded so each fills exactly one segment and the
    /// result stays a plain path. Extra keys in `params` are ignored. Returns
    /// the names of the missing placeholders when any is unbound.
    pub fn generate(&self, params: &Params) -> Result<String, Vec<String>> {
        let missing = self.missing_params(params);
        if !missing.is_empty() {
            return Err(missing);
        }

        let path = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => Cow::Borrowed(text.as_str()),
                Segment::Placeholder(name) => urlencoding::encode(&params[name]),
            })
            .fold(String::new(), |mut acc, part| {
                acc.push('/');
                acc.push_str(&part);
                acc
            });

        Ok(if path.is_empty() { "/".to_string() } else { path })
    }

    /// Matches a canonical path, extracting placeholder values.
    ///
    /// Static segments compare case-sensitively; every segment must be
    /// consumed on both sides. Extracted values are percent-decoded.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut path_segments = crate::path::segments(path);
        let mut params = Params::new();

        for segment in &self.segments {
            let actual = path_segments.next()?;
            match segment {
                Segment::Static(expected) if expected != actual => return None,
                Segment::Static(_) => {}
                Segment::Placeholder(name) => {
                    let value = urlencoding::decode(actual)
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| actual.to_string());
                    params.insert(name.clone(), value);
                }
            }
        }

        match path_segments.next() {
            Some(_) => None,
            None => Some(params),
        }
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_static() {
        let pattern = RoutePattern::parse("/admin/users").unwrap();
        assert!(!pattern.is_dynamic());
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Static("admin".to_string()),
                Segment::Static("users".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_placeholders_in_order() {
        let pattern = RoutePattern::parse("/user/posts/:postId/comments/:commentId").unwrap();
        let names: Vec<&str> = pattern.placeholders().collect();
        assert_eq!(names, vec!["postId", "commentId"]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            RoutePattern::parse("posts/:id"),
            Err(PatternError::MissingLeadingSlash("posts/:id".to_string()))
        );
        assert_eq!(
            RoutePattern::parse("/posts/:"),
            Err(PatternError::UnnamedPlaceholder("/posts/:".to_string()))
        );
        assert!(matches!(
            RoutePattern::parse("/a/:id/b/:id"),
            Err(PatternError::DuplicatePlaceholder { .. })
        ));
    }

    #[test]
    fn test_generate_ignores_extra_keys() {
        let pattern = RoutePattern::parse("/posts/:postId").unwrap();
        let path = pattern
            .generate(&params(&[("postId", "abc"), ("unused", "x")]))
            .unwrap();
        assert_eq!(path, "/posts/abc");
    }

    #[test]
    fn test_generate_reports_missing_and_empty() {
        let pattern = RoutePattern::parse("/user/posts/:postId/comments/:commentId").unwrap();
        let missing = pattern.generate(&params(&[("postId", "")])).unwrap_err();
        assert_eq!(missing, vec!["postId".to_string(), "commentId".to_string()]);
    }

    #[test]
    fn test_generate_encodes_values() {
        let pattern = RoutePattern::parse("/user/posts/:postId/comments/:commentId").unwrap();
        let path = pattern
            .generate(&params(&[("postId", "a b"), ("commentId", "b?tab=x#top")]))
            .unwrap();
        assert_eq!(path, "/user/posts/a%20b/comments/b%3Ftab%3Dx%23top");

        let found = pattern.matches(&path).unwrap();
        assert_eq!(found, params(&[("postId", "a b"), ("commentId", "b?tab=x#top")]));
    }

    #[test]
    fn test_generate_keeps_slashes_inside_one_segment() {
        let pattern = RoutePattern::parse("/user/posts/:postId/comments/:commentId").unwrap();
        let bound = params(&[("postId", "a"), ("commentId", "b/c")]);
        assert_eq!(pattern.multi_segment_params(&bound), vec!["commentId".to_string()]);
        assert_eq!(pattern.generate(&bound).unwrap(), "/user/posts/a/comments/b%2Fc");
    }

    #[test]
    fn test_generate_root() {
        let pattern = RoutePattern::parse("/").unwrap();
        assert_eq!(pattern.generate(&Params::new()).unwrap(), "/");
    }

    #[test]
    fn test_matches_extracts_params() {
        let pattern = RoutePattern::parse("/admin/users/:userId/posts").unwrap();
        let found = pattern.matches("/admin/users/42/posts").unwrap();
        assert_eq!(found, params(&[("userId", "42")]));
    }

    #[test]
    fn test_matches_rejects_length_and_static_mismatch() {
        let pattern = RoutePattern::parse("/admin/users/:userId").unwrap();
        assert!(pattern.matches("/admin/users").is_none());
        assert!(pattern.matches("/admin/users/1/posts").is_none());
        assert!(pattern.matches("/admin/groups/1").is_none());
        assert!(pattern.matches("/Admin/users/1").is_none());
    }
}
