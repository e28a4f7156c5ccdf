// File: src/middleware/permission.rs
// Purpose: Enforce route guards

use async_trait::async_trait;
use std::sync::Arc;

use super::{Denial, Middleware, MiddlewareContext, Next, Verdict};
use crate::routes::RouteTable;

/// Consults the guards of the route being left and of the target route.
///
/// Target guards come from the context's metadata when the navigator
/// supplied it, and from a table lookup of the path otherwise.
///
/// The first guard that refuses stops the stack; the remaining guards and
/// middleware never run.
#[derive(Debug, Clone)]
pub struct PermissionMiddleware {
    table: Arc<RouteTable>,
}

impl PermissionMiddleware {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Middleware for PermissionMiddleware {
    fn name(&self) -> &str {
        "permission"
    }

    async fn handle(&self, context: &MiddlewareContext, next: Next<'_>) -> anyhow::Result<Verdict> {
        if let Some(leaving) = self.table.metadata_for(&context.from) {
            for guard in &leaving.guards {
                if !guard.can_deactivate(context).await {
                    tracing::error!(
                        navigation = %context.id,
                        guard = guard.name(),
                        "Permission denied: cannot leave {}",
                        context.from
                    );
                    return Ok(Verdict::Deny(Denial::Deactivation {
                        guard: guard.name().to_string(),
                        path: context.from.clone(),
                    }));
                }
            }
        }

        let entering = context
            .metadata
            .as_ref()
            .or_else(|| self.table.metadata_for(&context.path));
        if let Some(entering) = entering {
            for guard in &entering.guards {
                if !guard.can_activate(context).await {
                    tracing::error!(
                        navigation = %context.id,
                        guard = guard.name(),
                        role = %context.role,
                        "Permission denied: {}",
                        context.path
                    );
                    return Ok(Verdict::Deny(Denial::Activation {
                        guard: guard.name().to_string(),
                        path: context.path.clone(),
                    }));
                }
            }
        }

        next.run(context).await
    }
}
