//! # RHTMX Nav
//!
//! Client-side navigation core for RHTMX applications:
//! - Typed route keys (`PublicRoute::About`, `DynamicRoute::Post { post_id }`)
//! - Parameter validation per route pattern
//! - Role guards and an async middleware stack around every navigation
//! - Bounded history with back/forward and branch-truncation
//! - Scroll restoration per path
//! - Loading and error listeners
//!
//! ## Usage
//!
//! ```no_run
//! use rhtmx_nav::{DynamicRoute, Navigator, NavigatorConfig, QueryParams, UserRole};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let navigator = Navigator::standard(NavigatorConfig::default())?;
//! navigator.update_role(UserRole::User);
//!
//! let navigated = navigator
//!     .navigate(
//!         DynamicRoute::OwnPost { post_id: "65a1f0c2b3d4e5f6a7b8c9d0".into() },
//!         QueryParams::new().with("tab", "comments"),
//!     )
//!     .await?;
//! assert_eq!(navigated.path, "/user/posts/65a1f0c2b3d4e5f6a7b8c9d0");
//!
//! navigator.go_back().await?;
//! assert_eq!(navigator.current_path(), "/");
//! # Ok(())
//! # }
//! ```
//!
//! ## Outcomes
//!
//! Every navigation resolves to `Result<Navigated, NavigationError>`. A failed
//! navigation never changes the current path or history; middleware and host
//! errors are additionally handed to the registered error handlers.

pub mod breadcrumb;
pub mod config;
pub mod error;
pub mod events;
pub mod guard;
pub mod history;
pub mod host;
pub mod middleware;
pub mod navigator;
pub mod path;
pub mod query;
pub mod role;
pub mod routes;
pub mod scroll;
pub mod validation;

pub use breadcrumb::Breadcrumb;
pub use config::{NavSetup, NavToml, NavigatorConfig};
pub use error::{Direction, NavigationError};
pub use events::{ListenerId, LoadingEvent};
pub use guard::{AdminGuard, AuthGuard, Guard, GuardRegistry};
pub use history::{History, HistoryEntry};
pub use host::HostNavigator;
pub use middleware::{
    Denial, ErrorLoggingMiddleware, LoggingMiddleware, Middleware, MiddlewareContext, Next,
    PermissionMiddleware, Pipeline, Verdict,
};
pub use navigator::{AvailableRoute, Navigated, Navigator};
pub use query::{QueryParams, QueryValue};
pub use role::UserRole;
pub use routes::{
    AdminRoute, DynamicRoute, Params, PublicRoute, RouteMetadata, RoutePattern, RouteRef,
    RouteTable, StaticRoute, UserRoute,
};
pub use scroll::{MemoryViewport, ScrollPosition, Viewport};
pub use validation::{ValidationErrors, ValidationRegistry, ValidationRule, ValidationRules};
