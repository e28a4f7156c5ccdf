pub mod routes;
pub mod simulate;

use anyhow::Result;
use rhtmx_nav::{
    ErrorLoggingMiddleware, GuardRegistry, LoggingMiddleware, NavSetup, NavToml, Navigator,
    NavigatorConfig, PermissionMiddleware, RouteTable, UserRole, ValidationRegistry,
};
use std::path::Path;
use std::sync::Arc;

use crate::host::LoggingHost;

/// Builds a navigator from `config` (or the standard routes) with a logging host attached
pub fn build_navigator(config: Option<&Path>, role: Option<UserRole>) -> Result<Navigator> {
    let mut setup = match config {
        Some(path) => NavToml::load(path)?.to_runtime(&GuardRegistry::with_builtins())?,
        None => NavSetup {
            config: NavigatorConfig::default(),
            table: RouteTable::standard(),
            validation: ValidationRegistry::with_defaults(),
        },
    };

    // Default stack is installed below, behind error logging
    let default_middleware = std::mem::replace(&mut setup.config.default_middleware, false);
    if let Some(role) = role {
        setup.config.initial_role = role;
    }

    let navigator = Navigator::from_setup(setup)?.with_host(Arc::new(LoggingHost));
    if default_middleware {
        navigator.use_middleware(Arc::new(ErrorLoggingMiddleware));
        navigator.use_middleware(Arc::new(LoggingMiddleware));
        navigator.use_middleware(Arc::new(PermissionMiddleware::new(navigator.table().clone())));
    }

    Ok(navigator)
}
