// File: src/validation.rs
// Purpose: Validation rules for dynamic route parameters

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::routes::{Params, RoutePattern};

// 24 lowercase hex digits, the id format of posts and users
static OBJECT_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{24}$").expect("object id regex is valid")
});

/// Custom predicate over a parameter value
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Checks applied to one parameter. Every configured check runs.
#[derive(Clone, Default)]
pub struct ValidationRule {
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub custom: Option<Predicate>,
    /// Replaces the default message of the regex and custom checks
    pub error_message: Option<String>,
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn custom(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.custom = Some(Arc::new(predicate));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Runs every check against `value`, collecting one message per failure.
    ///
    /// Lengths count characters, not bytes.
    pub fn check(&self, param: &str, value: &str) -> Vec<String> {
        let mut errors = Vec::new();
        let length = value.chars().count();

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                errors.push(
                    self.error_message
                        .clone()
                        .unwrap_or_else(|| format!("Invalid format for {}", param)),
                );
            }
        }

        if let Some(min) = self.min_length {
            if length < min {
                errors.push(format!("{} must be at least {} characters", param, min));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                errors.push(format!("{} must be at most {} characters", param, max));
            }
        }

        if let Some(custom) = &self.custom {
            if !custom(value) {
                errors.push(
                    self.error_message
                        .clone()
                        .unwrap_or_else(|| format!("Custom validation failed for {}", param)),
                );
            }
        }

        errors
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("custom", &self.custom.is_some())
            .field("error_message", &self.error_message)
            .finish()
    }
}

/// Parameter name → rule
pub type ValidationRules = BTreeMap<String, ValidationRule>;

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub param: String,
    pub message: String,
}

/// All checks that failed for one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("{}", .errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors {
    errors: Vec<ParamError>,
}

impl ValidationErrors {
    pub fn push(&mut self, param: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ParamError {
            param: param.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ParamError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Errors reported for `param`
    pub fn for_param<'a>(&'a self, param: &'a str) -> impl Iterator<Item = &'a ParamError> {
        self.errors.iter().filter(move |e| e.param == param)
    }
}

/// Rule sets keyed by route pattern string (e.g. `/posts/:postId`)
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    rules: HashMap<String, ValidationRules>,
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with object-id rules for the standard post and user routes
    pub fn with_defaults() -> Self {
        let post_id = || {
            ValidationRule::new()
                .matching(OBJECT_ID_REGEX.clone())
                .message("Invalid post id")
        };
        let user_id = || {
            ValidationRule::new()
                .matching(OBJECT_ID_REGEX.clone())
                .message("Invalid user id")
        };

        let mut registry = Self::new();
        registry.set_rules("/posts/:postId", rules([("postId", post_id())]));
        registry.set_rules("/user/posts/:postId", rules([("postId", post_id())]));
        registry.set_rules("/admin/users/:userId", rules([("userId", user_id())]));
        registry.set_rules("/admin/users/:userId/posts", rules([("userId", user_id())]));
        registry
    }

    /// Replaces the rule set of `pattern`
    pub fn set_rules(&mut self, pattern: &str, rules: ValidationRules) {
        self.rules.insert(pattern.to_string(), rules);
    }

    pub fn rules_for(&self, pattern: &str) -> Option<&ValidationRules> {
        self.rules.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates `params` for `pattern`.
    ///
    /// Every placeholder must be bound to a non-empty value that stays within
    /// one path segment. Rules then run for each parameter that has a value;
    /// a failure never stops the remaining checks.
    pub fn validate(&self, pattern: &RoutePattern, params: &Params) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for name in pattern.missing_params(params) {
            let message = format!("Missing value for {}", name);
            errors.push(name, message);
        }

        for name in pattern.multi_segment_params(params) {
            let message = format!("{} must not contain '/'", name);
            errors.push(name, message);
        }

        if let Some(rules) = self.rules_for(pattern.as_str()) {
            for (param, rule) in rules {
                let Some(value) = params.get(param).filter(|v| !v.is_empty()) else {
                    continue;
                };
                for message in rule.check(param, value) {
                    errors.push(param.as_str(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Builds a rule set from `(param, rule)` pairs
pub fn rules<const N: usize>(pairs: [(&str, ValidationRule); N]) -> ValidationRules {
    pairs
        .into_iter()
        .map(|(param, rule)| (param.to_string(), rule))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pattern(raw: &str) -> RoutePattern {
        RoutePattern::parse(raw).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_rules_accepts_any_non_empty_value() {
        let registry = ValidationRegistry::new();
        assert!(registry
            .validate(&pattern("/posts/:postId"), &params(&[("postId", "anything goes")]))
            .is_ok());
    }

    #[test]
    fn test_missing_and_empty_placeholders_fail() {
        let registry = ValidationRegistry::new();
        let errors = registry
            .validate(
                &pattern("/user/posts/:postId/comments/:commentId"),
                &params(&[("commentId", "")]),
            )
            .unwrap_err();
        assert_eq!(
            errors.messages(),
            vec!["Missing value for postId", "Missing value for commentId"]
        );
    }

    #[test]
    fn test_slash_in_value_fails() {
        let registry = ValidationRegistry::new();
        let errors = registry
            .validate(
                &pattern("/user/posts/:postId/comments/:commentId"),
                &params(&[("postId", "a"), ("commentId", "b/c")]),
            )
            .unwrap_err();
        assert_eq!(errors.messages(), vec!["commentId must not contain '/'"]);
        assert_eq!(errors.to_string(), "commentId must not contain '/'");
    }

    #[test]
    fn test_all_checks_run_after_a_failure() {
        let mut registry = ValidationRegistry::new();
        registry.set_rules(
            "/user/posts/:postId/comments/:commentId",
            rules([
                (
                    "commentId",
                    ValidationRule::new().min_length(3).custom(|v| v.starts_with('c')),
                ),
                (
                    "postId",
                    ValidationRule::new()
                        .matching(Regex::new(r"^\d+$").unwrap())
                        .max_length(2),
                ),
            ]),
        );

        let errors = registry
            .validate(
                &pattern("/user/posts/:postId/comments/:commentId"),
                &params(&[("postId", "abc"), ("commentId", "x")]),
            )
            .unwrap_err();

        assert_eq!(
            errors.messages(),
            vec![
                "commentId must be at least 3 characters",
                "Custom validation failed for commentId",
                "Invalid format for postId",
                "postId must be at most 2 characters",
            ]
        );
        assert_eq!(errors.for_param("postId").count(), 2);
    }

    #[test]
    fn test_custom_message_replaces_default() {
        let rule = ValidationRule::new()
            .matching(Regex::new("^[a-z]+$").unwrap())
            .message("lowercase only");
        assert_eq!(rule.check("slug", "ABC"), vec!["lowercase only".to_string()]);
        assert!(rule.check("slug", "abc").is_empty());
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = ValidationRule::new().max_length(3);
        assert!(rule.check("name", "日本語").is_empty());
        assert_eq!(rule.check("name", "日本語です").len(), 1);
    }

    #[test]
    fn test_default_rules_check_object_ids() {
        let registry = ValidationRegistry::with_defaults();
        let post = pattern("/posts/:postId");

        assert!(registry
            .validate(&post, &params(&[("postId", "65a1f0c2b3d4e5f6a7b8c9d0")]))
            .is_ok());

        let errors = registry
            .validate(&post, &params(&[("postId", "not-an-id")]))
            .unwrap_err();
        assert_eq!(errors.messages(), vec!["Invalid post id"]);
    }
}
