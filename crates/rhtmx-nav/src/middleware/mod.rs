//! Navigation middleware pipeline
//!
//! Every governed navigation runs through an ordered stack of middleware.
//! Each one receives the attempt's [`MiddlewareContext`] and a [`Next`]
//! continuation: calling `next.run(context)` hands over to the rest of the
//! stack, returning without calling it short-circuits the stack.
//!
//! ```
//! use async_trait::async_trait;
//! use rhtmx_nav::middleware::{Middleware, MiddlewareContext, Next, Verdict};
//!
//! /// Keeps everyone out of /maintenance
//! struct Maintenance;
//!
//! #[async_trait]
//! impl Middleware for Maintenance {
//!     fn name(&self) -> &str {
//!         "maintenance"
//!     }
//!
//!     async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict> {
//!         if context.path.starts_with("/maintenance") {
//!             return Ok(Verdict::declined_by(self.name()));
//!         }
//!         next.run(context).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::query::QueryParams;
use crate::role::UserRole;
use crate::routes::{Params, RouteMetadata};

mod logging;
mod permission;

pub use logging::{ErrorLoggingMiddleware, LoggingMiddleware};
pub use permission::PermissionMiddleware;

/// What a navigation attempt is about; built fresh per attempt
#[derive(Debug, Clone)]
pub struct MiddlewareContext {
    /// Correlates every log line of one attempt
    pub id: Uuid,
    /// Target path
    pub path: String,
    /// Path being left
    pub from: String,
    pub params: Params,
    pub query: QueryParams,
    /// Role at the time of the attempt, never the role a history entry was made with
    pub role: UserRole,
    /// Metadata of the requested route; guards are read from here when set
    pub metadata: Option<RouteMetadata>,
}

impl MiddlewareContext {
    pub fn new(path: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            from: "/".to_string(),
            params: Params::new(),
            query: QueryParams::new(),
            role,
            metadata: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_metadata(mut self, metadata: RouteMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Target path plus query string, as handed to the host
    pub fn href(&self) -> String {
        format!("{}{}", self.path, self.query.to_query_string())
    }
}

/// Why a navigation was turned away
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("guard '{guard}' refused entry to {path}")]
    Activation { guard: String, path: String },

    #[error("guard '{guard}' refused to leave {path}")]
    Deactivation { guard: String, path: String },

    #[error("middleware '{middleware}' declined the navigation")]
    Middleware { middleware: String },
}

/// Outcome of a middleware stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(Denial),
}

impl Verdict {
    /// Plain decline attributed to a middleware
    pub fn declined_by(middleware: &str) -> Self {
        Verdict::Deny(Denial::Middleware {
            middleware: middleware.to_string(),
        })
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// An async interceptor wrapped around every governed navigation
#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    /// Returning `Err` aborts the navigation and reaches the error handlers
    async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict>;
}

/// Continuation over the rest of the stack
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    /// Runs the remaining middleware; an exhausted stack allows
    pub async fn run(self, context: &MiddlewareContext) -> anyhow::Result<Verdict> {
        match self.rest.split_first() {
            Some((current, rest)) => current.handle(context, Next { rest }).await,
            None => Ok(Verdict::Allow),
        }
    }
}

/// Ordered middleware stack; insertion order is execution order
#[derive(Clone, Default)]
pub struct Pipeline {
    stack: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.stack.push(middleware);
    }

    pub fn with(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.push(middleware);
        self
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stack.iter().map(|m| m.name()).collect()
    }

    pub async fn execute(&self, context: &MiddlewareContext) -> anyhow::Result<Verdict> {
        Next { rest: &self.stack }.run(context).await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("stack", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records its name, then continues or stops
    struct Marker {
        name: &'static str,
        proceed: bool,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Middleware for Marker {
        fn name(&self) -> &str {
            self.name
        }

        async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict> {
            self.seen.lock().unwrap().push(self.name);
            if self.proceed {
                next.run(context).await
            } else {
                Ok(Verdict::declined_by(self.name))
            }
        }
    }

    struct Failing;

    #[async_trait]
    impl Middleware for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn handle(&self, _context: &MiddlewareContext, _next: Next<'_>) -> anyhow::Result<Verdict> {
            anyhow::bail!("permission service unreachable")
        }
    }

    fn marker(name: &'static str, proceed: bool, seen: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn Middleware> {
        Arc::new(Marker {
            name,
            proceed,
            seen: seen.clone(),
        })
    }

    fn context() -> MiddlewareContext {
        MiddlewareContext::new("/about", UserRole::Guest)
    }

    #[tokio::test]
    async fn test_empty_pipeline_allows() {
        assert_eq!(Pipeline::new().execute(&context()).await.unwrap(), Verdict::Allow);
    }

    #[tokio::test]
    async fn test_runs_in_insertion_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with(marker("first", true, &seen))
            .with(marker("second", true, &seen))
            .with(marker("third", true, &seen));

        let verdict = pipeline.execute(&context()).await.unwrap();
        assert!(verdict.is_allowed());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with(marker("first", true, &seen))
            .with(marker("gate", false, &seen))
            .with(marker("never", true, &seen));

        let verdict = pipeline.execute(&context()).await.unwrap();
        assert_eq!(verdict, Verdict::declined_by("gate"));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "gate"]);
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with(marker("first", true, &seen))
            .with(Arc::new(Failing));

        let err = pipeline.execute(&context()).await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }

    #[test]
    fn test_href_includes_query() {
        let ctx = MiddlewareContext::new("/posts/1", UserRole::User)
            .with_query(QueryParams::new().with("page", 2));
        assert_eq!(ctx.href(), "/posts/1?page=2");
    }
}
