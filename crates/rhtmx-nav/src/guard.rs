//! Route guards
//!
//! A guard decides whether a navigation may enter (`can_activate`) or leave
//! (`can_deactivate`) the route whose metadata lists it. Both checks are
//! async so a guard may consult a remote permission service.

use crate::middleware::MiddlewareContext;
use crate::role::UserRole;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability check attached to route metadata
#[async_trait]
pub trait Guard: Send + Sync {
    /// Name used in configuration files and denial reports
    fn name(&self) -> &str;

    /// May the navigation described by `context` enter the route?
    async fn can_activate(&self, context: &MiddlewareContext) -> bool;

    /// May the navigation leave the route it is currently on?
    async fn can_deactivate(&self, _context: &MiddlewareContext) -> bool {
        true
    }
}

/// Admits any signed-in role
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

#[async_trait]
impl Guard for AuthGuard {
    fn name(&self) -> &str {
        "auth"
    }

    async fn can_activate(&self, context: &MiddlewareContext) -> bool {
        context.role != UserRole::Guest
    }
}

/// Admits the admin role only
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGuard;

#[async_trait]
impl Guard for AdminGuard {
    fn name(&self) -> &str {
        "admin"
    }

    async fn can_activate(&self, context: &MiddlewareContext) -> bool {
        context.role == UserRole::Admin
    }
}

/// Named guards that configuration files can refer to
#[derive(Clone, Default)]
pub struct GuardRegistry {
    guards: HashMap<String, Arc<dyn Guard>>,
}

impl GuardRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `auth` and `admin`
    pub fn with_builtins() -> Self {
        Self::new()
            .with(Arc::new(AuthGuard))
            .with(Arc::new(AdminGuard))
    }

    /// Registers a guard under its own name, replacing any previous one
    pub fn with(mut self, guard: Arc<dyn Guard>) -> Self {
        self.register(guard);
        self
    }

    pub fn register(&mut self, guard: Arc<dyn Guard>) {
        self.guards.insert(guard.name().to_string(), guard);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Guard>> {
        self.guards.get(name).cloned()
    }

    /// Resolves every name or reports the first unknown one
    pub fn resolve_all(&self, names: &[String]) -> anyhow::Result<Vec<Arc<dyn Guard>>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown guard '{}'", name))
            })
            .collect()
    }
}

impl std::fmt::Debug for GuardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.guards.keys().collect();
        names.sort();
        f.debug_struct("GuardRegistry").field("guards", &names).finish()
    }
}
