// File: src/middleware/logging.rs
// Purpose: Observe-only middleware

use async_trait::async_trait;

use super::{Middleware, MiddlewareContext, Next, Verdict};

/// Logs every navigation request, then continues
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict> {
        tracing::info!(
            navigation = %context.id,
            from = %context.from,
            role = %context.role,
            params = ?context.params,
            query = %context.query.to_query_string(),
            "Navigation requested: {}",
            context.path
        );
        next.run(context).await
    }
}

/// Logs errors raised further down the stack and passes them on
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLoggingMiddleware;

#[async_trait]
impl Middleware for ErrorLoggingMiddleware {
    fn name(&self) -> &str {
        "error-logging"
    }

    async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict> {
        match next.run(context).await {
            Err(err) => {
                tracing::error!(navigation = %context.id, "Navigation error: {:#}", err);
                Err(err)
            }
            verdict => verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Pipeline;
    use crate::role::UserRole;
    use std::sync::Arc;

    struct Boom;

    #[async_trait]
    impl Middleware for Boom {
        fn name(&self) -> &str {
            "boom"
        }

        async fn handle(&self, _context: &MiddlewareContext, _next: Next<'_>) -> anyhow::Result<Verdict> {
            Err(anyhow::anyhow!("boom"))
        }
    }

    #[tokio::test]
    async fn test_logging_always_continues() {
        let pipeline = Pipeline::new()
            .with(Arc::new(LoggingMiddleware))
            .with(Arc::new(LoggingMiddleware));
        let context = MiddlewareContext::new("/about", UserRole::Guest);
        assert_eq!(pipeline.execute(&context).await.unwrap(), Verdict::Allow);
    }

    #[tokio::test]
    async fn test_error_logging_passes_errors_on() {
        let pipeline = Pipeline::new()
            .with(Arc::new(ErrorLoggingMiddleware))
            .with(Arc::new(Boom));
        let context = MiddlewareContext::new("/about", UserRole::Guest);
        let err = pipeline.execute(&context).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
