//! Route table: (section, name) → path or pattern, plus metadata
//!
//! Static paths and dynamic patterns live in separate namespaces, so
//! `user.settings` and `dynamic.user.settings` never collide.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::pattern::RoutePattern;
use super::Params;
use crate::guard::Guard;
use crate::path::normalize_path;

/// Descriptive data attached to every route
#[derive(Clone, Default)]
pub struct RouteMetadata {
    pub title: String,
    pub breadcrumb: Option<String>,
    pub guards: Vec<Arc<dyn Guard>>,
    pub layout: Option<String>,
}

impl RouteMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Metadata recorded for paths the table does not know
    pub fn untitled() -> Self {
        Self::new("Untitled")
    }

    pub fn with_breadcrumb(mut self, label: impl Into<String>) -> Self {
        self.breadcrumb = Some(label.into());
        self
    }

    pub fn with_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn with_guards(mut self, guards: impl IntoIterator<Item = Arc<dyn Guard>>) -> Self {
        self.guards.extend(guards);
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn guard_names(&self) -> Vec<&str> {
        self.guards.iter().map(|g| g.name()).collect()
    }
}

impl fmt::Debug for RouteMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMetadata")
            .field("title", &self.title)
            .field("breadcrumb", &self.breadcrumb)
            .field("guards", &self.guard_names())
            .field("layout", &self.layout)
            .finish()
    }
}

/// Two-level route key: section ("public", "user", "admin", ...) and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteRef {
    pub section: String,
    pub name: String,
}

impl RouteRef {
    pub fn new(section: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RouteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.name)
    }
}

impl FromStr for RouteRef {
    type Err = anyhow::Error;

    /// Parses `section.name`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((section, name)) if !section.is_empty() && !name.is_empty() => {
                Ok(Self::new(section, name))
            }
            _ => anyhow::bail!("Route reference '{}' must look like <section>.<name>", s),
        }
    }
}

/// Whether a route came from the static or the dynamic namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone)]
pub struct StaticEntry {
    pub path: String,
    pub metadata: RouteMetadata,
}

#[derive(Debug, Clone)]
pub struct DynamicEntry {
    pub pattern: RoutePattern,
    pub metadata: RouteMetadata,
}

/// A concrete path matched back to its table entry
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'a> {
    pub route: RouteRef,
    pub kind: RouteKind,
    pub metadata: &'a RouteMetadata,
    pub params: Params,
}

/// Path a static route gets when its configuration names none
pub fn default_static_path(name: &str) -> String {
    if name == "home" {
        "/".to_string()
    } else {
        format!("/{}", name)
    }
}

/// The application's route table
///
/// Built once at start-up and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    statics: BTreeMap<String, BTreeMap<String, StaticEntry>>,
    dynamics: BTreeMap<String, BTreeMap<String, DynamicEntry>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixed path; the path is normalized first
    pub fn add_static(
        &mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        path: &str,
        metadata: RouteMetadata,
    ) {
        let entry = StaticEntry {
            path: normalize_path(path).into_owned(),
            metadata,
        };
        self.statics
            .entry(section.into())
            .or_default()
            .insert(name.into(), entry);
    }

    pub fn add_dynamic(
        &mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        pattern: RoutePattern,
        metadata: RouteMetadata,
    ) {
        self.dynamics
            .entry(section.into())
            .or_default()
            .insert(name.into(), DynamicEntry { pattern, metadata });
    }

    /// Builder form of [`add_static`](Self::add_static)
    pub fn with_static(
        mut self,
        section: &str,
        name: &str,
        path: &str,
        metadata: RouteMetadata,
    ) -> Self {
        self.add_static(section, name, path, metadata);
        self
    }

    /// Builder form of [`add_dynamic`](Self::add_dynamic)
    pub fn with_dynamic(
        mut self,
        section: &str,
        name: &str,
        pattern: RoutePattern,
        metadata: RouteMetadata,
    ) -> Self {
        self.add_dynamic(section, name, pattern, metadata);
        self
    }

    pub fn static_entry(&self, route: &RouteRef) -> Option<&StaticEntry> {
        self.statics.get(&route.section)?.get(&route.name)
    }

    pub fn dynamic_entry(&self, route: &RouteRef) -> Option<&DynamicEntry> {
        self.dynamics.get(&route.section)?.get(&route.name)
    }

    pub fn static_routes(&self) -> impl Iterator<Item = (RouteRef, &StaticEntry)> {
        self.statics.iter().flat_map(|(section, routes)| {
            routes
                .iter()
                .map(move |(name, entry)| (RouteRef::new(section.as_str(), name.as_str()), entry))
        })
    }

    pub fn dynamic_routes(&self) -> impl Iterator<Item = (RouteRef, &DynamicEntry)> {
        self.dynamics.iter().flat_map(|(section, routes)| {
            routes
                .iter()
                .map(move |(name, entry)| (RouteRef::new(section.as_str(), name.as_str()), entry))
        })
    }

    pub fn len(&self) -> usize {
        self.statics.values().map(BTreeMap::len).sum::<usize>()
            + self.dynamics.values().map(BTreeMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the route serving a concrete path.
    ///
    /// Static paths win over patterns; among matching patterns the one
    /// with the fewest placeholders wins.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<'_>> {
        let path = normalize_path(path);

        if let Some((route, entry)) = self.static_routes().find(|(_, e)| e.path == path) {
            return Some(ResolvedRoute {
                route,
                kind: RouteKind::Static,
                metadata: &entry.metadata,
                params: Params::new(),
            });
        }

        self.dynamic_routes()
            .filter_map(|(route, entry)| {
                entry
                    .pattern
                    .matches(&path)
                    .map(|params| (route, entry, params))
            })
            .min_by_key(|(_, entry, _)| entry.pattern.placeholders().count())
            .map(|(route, entry, params)| ResolvedRoute {
                route,
                kind: RouteKind::Dynamic,
                metadata: &entry.metadata,
                params,
            })
    }

    pub fn metadata_for(&self, path: &str) -> Option<&RouteMetadata> {
        self.resolve(path).map(|resolved| resolved.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::AuthGuard;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_static("public", "home", "/", RouteMetadata::new("Home"))
            .with_static(
                "admin",
                "users",
                "/admin/users/",
                RouteMetadata::new("Users").with_breadcrumb("Users"),
            )
            .with_dynamic(
                "admin",
                "userManagement",
                RoutePattern::parse("/admin/users/:userId").unwrap(),
                RouteMetadata::new("User").with_guard(Arc::new(AuthGuard)),
            )
            .with_dynamic(
                "admin",
                "anyTab",
                RoutePattern::parse("/admin/:area/:tab").unwrap(),
                RouteMetadata::new("Tab"),
            )
    }

    #[test]
    fn test_static_path_is_normalized() {
        let table = table();
        let entry = table.static_entry(&RouteRef::new("admin", "users")).unwrap();
        assert_eq!(entry.path, "/admin/users");
    }

    #[test]
    fn test_namespaces_are_separate() {
        let table = table();
        let key = RouteRef::new("admin", "users");
        assert!(table.static_entry(&key).is_some());
        assert!(table.dynamic_entry(&key).is_none());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_resolve_prefers_static() {
        let table = table();
        let resolved = table.resolve("/admin/users").unwrap();
        assert_eq!(resolved.kind, RouteKind::Static);
        assert_eq!(resolved.metadata.title, "Users");
    }

    #[test]
    fn test_resolve_prefers_fewer_placeholders() {
        let table = table();
        let resolved = table.resolve("/admin/users/7").unwrap();
        assert_eq!(resolved.route, RouteRef::new("admin", "userManagement"));
        assert_eq!(resolved.params.get("userId").map(String::as_str), Some("7"));
        assert_eq!(resolved.metadata.guard_names(), vec!["auth"]);

        let resolved = table.resolve("/admin/reports/daily").unwrap();
        assert_eq!(resolved.route, RouteRef::new("admin", "anyTab"));
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(table().resolve("/nowhere/at/all/x").is_none());
    }

    #[test]
    fn test_route_ref_parse() {
        let route: RouteRef = "user.profile".parse().unwrap();
        assert_eq!(route, RouteRef::new("user", "profile"));
        assert_eq!(route.to_string(), "user.profile");
        assert!("profile".parse::<RouteRef>().is_err());
        assert!(".profile".parse::<RouteRef>().is_err());
    }

    #[test]
    fn test_default_static_path() {
        assert_eq!(default_static_path("home"), "/");
        assert_eq!(default_static_path("about"), "/about");
    }
}
