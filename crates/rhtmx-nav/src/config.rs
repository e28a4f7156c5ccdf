// File: src/config.rs
// Purpose: Navigator settings and nav.toml parsing

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::guard::GuardRegistry;
use crate::history::DEFAULT_MAX_HISTORY_LENGTH;
use crate::role::UserRole;
use crate::routes::{default_static_path, RouteMetadata, RoutePattern, RouteTable};
use crate::validation::{ValidationRegistry, ValidationRule, ValidationRules};

/// Per-session navigator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Path the session starts on
    #[serde(default = "default_initial_path")]
    pub initial_path: String,

    #[serde(default)]
    pub initial_role: UserRole,

    /// Upper bound on history entries (at least 1)
    #[serde(default = "default_max_history_length")]
    pub max_history_length: usize,

    /// Install the logging and permission middleware on construction
    #[serde(default = "default_true")]
    pub default_middleware: bool,
}

fn default_initial_path() -> String {
    "/".to_string()
}

fn default_max_history_length() -> usize {
    DEFAULT_MAX_HISTORY_LENGTH
}

fn default_true() -> bool {
    true
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            initial_path: default_initial_path(),
            initial_role: UserRole::default(),
            max_history_length: default_max_history_length(),
            default_middleware: true,
        }
    }
}

impl NavigatorConfig {
    pub fn with_initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = path.into();
        self
    }

    pub fn with_initial_role(mut self, role: UserRole) -> Self {
        self.initial_role = role;
        self
    }

    pub fn with_max_history_length(mut self, max: usize) -> Self {
        self.max_history_length = max;
        self
    }

    /// Leaves the middleware stack empty
    pub fn without_default_middleware(mut self) -> Self {
        self.default_middleware = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history_length == 0 {
            anyhow::bail!("max_history_length must be at least 1");
        }
        if !self.initial_path.starts_with('/') {
            anyhow::bail!(
                "initial_path must start with '/', got '{}'",
                self.initial_path
            );
        }
        Ok(())
    }
}

/// Metadata keys shared by static and dynamic route entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataToml {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub breadcrumb: Option<String>,

    #[serde(default)]
    pub layout: Option<String>,

    /// Guard names, resolved through a [`GuardRegistry`]
    #[serde(default)]
    pub guards: Vec<String>,
}

impl MetadataToml {
    fn to_metadata(&self, guards: &GuardRegistry) -> Result<RouteMetadata> {
        let mut metadata = match &self.title {
            Some(title) => RouteMetadata::new(title.as_str()),
            None => RouteMetadata::untitled(),
        };
        metadata.breadcrumb = self.breadcrumb.clone();
        metadata.layout = self.layout.clone();
        Ok(metadata.with_guards(guards.resolve_all(&self.guards)?))
    }
}

/// `[routes.static.<section>.<name>]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticRouteToml {
    /// Defaults to `/` for `home` and `/<name>` otherwise
    #[serde(default)]
    pub path: Option<String>,

    #[serde(flatten)]
    pub metadata: MetadataToml,
}

/// `[routes.dynamic.<section>.<name>]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicRouteToml {
    pub pattern: String,

    #[serde(flatten)]
    pub metadata: MetadataToml,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesToml {
    #[serde(default, rename = "static")]
    pub statics: BTreeMap<String, BTreeMap<String, StaticRouteToml>>,

    #[serde(default)]
    pub dynamic: BTreeMap<String, BTreeMap<String, DynamicRouteToml>>,
}

/// `[validation."<pattern>".<param>]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleToml {
    /// Regular expression the whole value must match
    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub min_length: Option<usize>,

    #[serde(default)]
    pub max_length: Option<usize>,

    #[serde(default)]
    pub message: Option<String>,
}

impl RuleToml {
    fn to_rule(&self) -> Result<ValidationRule> {
        let mut rule = ValidationRule::new();
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Invalid regex '{}'", pattern))?;
            rule = rule.matching(regex);
        }
        if let Some(min) = self.min_length {
            rule = rule.min_length(min);
        }
        if let Some(max) = self.max_length {
            rule = rule.max_length(max);
        }
        if let Some(message) = &self.message {
            rule = rule.message(message.as_str());
        }
        Ok(rule)
    }
}

/// Contents of a nav.toml file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavToml {
    #[serde(default)]
    pub navigator: NavigatorConfig,

    #[serde(default)]
    pub routes: RoutesToml,

    #[serde(default)]
    pub validation: BTreeMap<String, BTreeMap<String, RuleToml>>,
}

/// Everything a [`Navigator`](crate::Navigator) is built from
#[derive(Debug, Clone)]
pub struct NavSetup {
    pub config: NavigatorConfig,
    pub table: RouteTable,
    pub validation: ValidationRegistry,
}

impl NavToml {
    /// Load a nav.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read nav config: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse nav config: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Convert the file contents into runtime values
    pub fn to_runtime(&self, guards: &GuardRegistry) -> Result<NavSetup> {
        self.navigator.validate()?;

        let mut table = RouteTable::new();

        for (section, routes) in &self.routes.statics {
            for (name, route) in routes {
                let path = route
                    .path
                    .clone()
                    .unwrap_or_else(|| default_static_path(name));
                let metadata = route
                    .metadata
                    .to_metadata(guards)
                    .with_context(|| format!("In route static.{}.{}", section, name))?;
                table.add_static(section.as_str(), name.as_str(), &path, metadata);
            }
        }

        for (section, routes) in &self.routes.dynamic {
            for (name, route) in routes {
                let context = || format!("In route dynamic.{}.{}", section, name);
                let pattern = RoutePattern::parse(&route.pattern).with_context(context)?;
                let metadata = route.metadata.to_metadata(guards).with_context(context)?;
                table.add_dynamic(section.as_str(), name.as_str(), pattern, metadata);
            }
        }

        let mut validation = ValidationRegistry::new();
        for (pattern, params) in &self.validation {
            let known = table
                .dynamic_routes()
                .any(|(_, entry)| entry.pattern.as_str() == pattern);
            if !known {
                tracing::warn!("Validation rules for '{}' match no dynamic route", pattern);
            }

            let mut rules = ValidationRules::new();
            for (param, rule) in params {
                let rule = rule
                    .to_rule()
                    .with_context(|| format!("In validation rule {} of '{}'", param, pattern))?;
                rules.insert(param.clone(), rule);
            }
            validation.set_rules(pattern, rules);
        }

        tracing::debug!(
            routes = table.len(),
            rule_sets = validation.len(),
            "Loaded navigation config"
        );

        Ok(NavSetup {
            config: self.navigator.clone(),
            table,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteRef;
    use pretty_assertions::assert_eq;

    const NAV_TOML: &str = r#"
[navigator]
initial_role = "user"
max_history_length = 10

[routes.static.public.home]
title = "Home"
breadcrumb = "Home"

[routes.static.public.about]
title = "About"

[routes.static.admin.users]
path = "/admin/users"
title = "Users"
guards = ["admin"]
layout = "admin"

[routes.dynamic.public.post]
pattern = "/posts/:postId"
title = "Post"
breadcrumb = "Post"

[validation."/posts/:postId".postId]
pattern = "^[0-9]+$"
max_length = 6
message = "Post ids are numeric"
"#;

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert_eq!(config.initial_path, "/");
        assert_eq!(config.initial_role, UserRole::Guest);
        assert_eq!(config.max_history_length, 50);
        assert!(config.default_middleware);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = NavToml::parse("").unwrap();
        assert_eq!(file.navigator, NavigatorConfig::default());
        let setup = file.to_runtime(&GuardRegistry::with_builtins()).unwrap();
        assert!(setup.table.is_empty());
    }

    #[test]
    fn test_full_file() {
        let setup = NavToml::parse(NAV_TOML)
            .unwrap()
            .to_runtime(&GuardRegistry::with_builtins())
            .unwrap();

        assert_eq!(setup.config.initial_role, UserRole::User);
        assert_eq!(setup.config.max_history_length, 10);

        let home = setup.table.static_entry(&RouteRef::new("public", "home")).unwrap();
        assert_eq!(home.path, "/");
        let about = setup.table.static_entry(&RouteRef::new("public", "about")).unwrap();
        assert_eq!(about.path, "/about");
        assert_eq!(about.metadata.breadcrumb, None);

        let users = setup.table.static_entry(&RouteRef::new("admin", "users")).unwrap();
        assert_eq!(users.metadata.guard_names(), vec!["admin"]);
        assert_eq!(users.metadata.layout.as_deref(), Some("admin"));

        let rules = setup.validation.rules_for("/posts/:postId").unwrap();
        assert_eq!(rules["postId"].check("postId", "12"), Vec::<String>::new());
        assert_eq!(
            rules["postId"].check("postId", "abc"),
            vec!["Post ids are numeric".to_string()]
        );
    }

    #[test]
    fn test_unknown_guard_is_rejected() {
        let file = NavToml::parse(
            r#"
[routes.static.user.profile]
guards = ["staff"]
"#,
        )
        .unwrap();

        let err = file.to_runtime(&GuardRegistry::with_builtins()).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown guard 'staff'"));
    }

    #[test]
    fn test_bad_pattern_and_regex_are_rejected() {
        let guards = GuardRegistry::with_builtins();

        let file = NavToml::parse(
            r#"
[routes.dynamic.public.post]
pattern = "posts/:postId"
"#,
        )
        .unwrap();
        assert!(file.to_runtime(&guards).is_err());

        let file = NavToml::parse(
            r#"
[validation."/posts/:postId".postId]
pattern = "("
"#,
        )
        .unwrap();
        assert!(file.to_runtime(&guards).is_err());
    }

    #[test]
    fn test_zero_history_length_is_rejected() {
        let file = NavToml::parse("[navigator]\nmax_history_length = 0\n").unwrap();
        assert!(file.to_runtime(&GuardRegistry::with_builtins()).is_err());
    }
}
