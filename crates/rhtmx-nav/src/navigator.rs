//! The router core
//!
//! A [`Navigator`] is built once per session and owns everything that
//! changes while the user moves around: current path and role, history,
//! stored scroll offsets, the middleware stack and the listener registries.
//!
//! Every navigation (static, dynamic, back, forward) takes the same
//! governed path:
//!
//! 1. loading is switched on
//! 2. the scroll offset of the current path is saved
//! 3. the middleware stack runs (guards are consulted there)
//! 4. the host performs the transition, when one is attached
//! 5. current path and history are updated together, then the stored
//!    offset of the new path (or the origin) is restored
//! 6. loading is switched off, whatever happened before
//!
//! Navigations are queued: a request that arrives while another one is in
//! flight waits for it and then runs against the state it left behind.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::breadcrumb::{self, Breadcrumb};
use crate::config::{NavSetup, NavigatorConfig};
use crate::error::{Direction, NavigationError};
use crate::events::{ErrorHandler, EventBus, ListenerId, LoadingEvent, LoadingListener};
use crate::history::{History, HistoryEntry};
use crate::host::HostNavigator;
use crate::middleware::{
    LoggingMiddleware, Middleware, MiddlewareContext, PermissionMiddleware, Pipeline, Verdict,
};
use crate::path::normalize_path;
use crate::query::QueryParams;
use crate::role::UserRole;
use crate::routes::{DynamicRoute, Params, RouteMetadata, RouteRef, RouteTable, StaticRoute};
use crate::scroll::{MemoryViewport, ScrollPosition, ScrollStore, Viewport};
use crate::validation::{ValidationErrors, ValidationRegistry, ValidationRules};

/// A committed navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigated {
    /// Id of the attempt, as logged by the middleware
    pub id: Uuid,
    pub path: String,
    pub history_index: usize,
}

/// A static route as seen by the current role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableRoute {
    pub route: String,
    pub path: String,
    pub title: String,
    /// Every guard of the route admits the current role
    pub allowed: bool,
}

/// State mutated by navigations; never held across an await
#[derive(Debug)]
struct SessionState {
    role: UserRole,
    current_path: String,
    history: History,
    scroll: ScrollStore,
    loading: bool,
}

/// Where a governed navigation goes
struct Target {
    path: String,
    params: Params,
    query: QueryParams,
    metadata: RouteMetadata,
}

/// How a successful navigation lands in history
#[derive(Debug, Clone, Copy)]
enum Commit {
    /// Append a new entry after the cursor
    Push,
    /// Move the cursor to an existing entry
    Traverse(usize),
}

/// Switches loading on for its lifetime
struct LoadingGuard<'a> {
    navigator: &'a Navigator,
}

impl<'a> LoadingGuard<'a> {
    fn start(navigator: &'a Navigator) -> Self {
        navigator.set_loading(true);
        Self { navigator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.navigator.set_loading(false);
    }
}

/// Session navigation service
pub struct Navigator {
    table: Arc<RouteTable>,
    state: RwLock<SessionState>,
    pipeline: RwLock<Pipeline>,
    validation: RwLock<ValidationRegistry>,
    events: EventBus,
    host: RwLock<Option<Arc<dyn HostNavigator>>>,
    viewport: Arc<dyn Viewport>,
    // Held for the whole governed sequence; tokio's mutex is FIFO
    gate: Mutex<()>,
}

impl Navigator {
    /// Creates a session on `config.initial_path`.
    ///
    /// With `default_middleware` the stack starts as logging, permission.
    pub fn new(config: NavigatorConfig, table: RouteTable) -> anyhow::Result<Self> {
        config.validate()?;

        let table = Arc::new(table);
        let initial_path = normalize_path(&config.initial_path).into_owned();
        let metadata = table
            .metadata_for(&initial_path)
            .cloned()
            .unwrap_or_else(RouteMetadata::untitled);
        let history = History::new(
            HistoryEntry::new(initial_path.as_str(), metadata),
            config.max_history_length,
        );

        let mut pipeline = Pipeline::new();
        if config.default_middleware {
            pipeline.push(Arc::new(LoggingMiddleware));
            pipeline.push(Arc::new(PermissionMiddleware::new(table.clone())));
        }

        tracing::debug!(
            path = %initial_path,
            role = %config.initial_role,
            middleware = ?pipeline.names(),
            "Navigator created"
        );

        Ok(Self {
            table,
            state: RwLock::new(SessionState {
                role: config.initial_role,
                current_path: initial_path,
                history,
                scroll: ScrollStore::new(),
                loading: false,
            }),
            pipeline: RwLock::new(pipeline),
            validation: RwLock::new(ValidationRegistry::new()),
            events: EventBus::new(),
            host: RwLock::new(None),
            viewport: Arc::new(MemoryViewport::new()),
            gate: Mutex::new(()),
        })
    }

    /// Navigator for the standard application routes and their id rules
    pub fn standard(config: NavigatorConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config, RouteTable::standard())?
            .with_validation(ValidationRegistry::with_defaults()))
    }

    /// Navigator built from a loaded nav.toml
    pub fn from_setup(setup: NavSetup) -> anyhow::Result<Self> {
        Ok(Self::new(setup.config, setup.table)?.with_validation(setup.validation))
    }

    pub fn with_viewport(mut self, viewport: Arc<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_validation(mut self, validation: ValidationRegistry) -> Self {
        self.validation = RwLock::new(validation);
        self
    }

    pub fn with_host(self, host: Arc<dyn HostNavigator>) -> Self {
        self.set_host(host);
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- navigation ----

    /// Navigates to a typed dynamic route of the standard table
    pub async fn navigate(
        &self,
        route: DynamicRoute,
        query: QueryParams,
    ) -> Result<Navigated, NavigationError> {
        self.navigate_to_dynamic(&route.route_ref(), route.params(), query)
            .await
    }

    /// Navigates to a typed static route of the standard table
    pub async fn navigate_static(
        &self,
        route: StaticRoute,
        query: QueryParams,
    ) -> Result<Navigated, NavigationError> {
        self.navigate_to_static(&route.route_ref(), query).await
    }

    /// Validates `params`, fills in the pattern of `route` and navigates there
    pub async fn navigate_to_dynamic(
        &self,
        route: &RouteRef,
        params: Params,
        query: QueryParams,
    ) -> Result<Navigated, NavigationError> {
        let _turn = self.gate.lock().await;

        let Some(entry) = self.table.dynamic_entry(route) else {
            tracing::warn!("Unknown dynamic route: {}", route);
            return Err(NavigationError::UnknownRoute {
                route: route.clone(),
            });
        };

        let validated = self
            .validation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .validate(&entry.pattern, &params);
        if let Err(errors) = validated {
            tracing::warn!(route = %route, "Route validation failed: {}", errors);
            return Err(NavigationError::InvalidParams(errors));
        }

        let path = entry.pattern.generate(&params).map_err(|missing| {
            let mut errors = ValidationErrors::default();
            for name in missing {
                let message = format!("Missing value for {}", name);
                errors.push(name, message);
            }
            NavigationError::InvalidParams(errors)
        })?;

        let target = Target {
            path,
            params,
            query,
            metadata: entry.metadata.clone(),
        };
        self.govern(target, Commit::Push, false).await
    }

    /// Navigates to the fixed path of `route`; requires an attached host
    pub async fn navigate_to_static(
        &self,
        route: &RouteRef,
        query: QueryParams,
    ) -> Result<Navigated, NavigationError> {
        let _turn = self.gate.lock().await;

        let Some(entry) = self.table.static_entry(route) else {
            tracing::warn!("Unknown static route: {}", route);
            return Err(NavigationError::UnknownRoute {
                route: route.clone(),
            });
        };

        let target = Target {
            path: entry.path.clone(),
            params: Params::new(),
            query,
            metadata: entry.metadata.clone(),
        };
        self.govern(target, Commit::Push, true).await
    }

    /// Replays the previous history entry under the current role
    pub async fn go_back(&self) -> Result<Navigated, NavigationError> {
        self.traverse(Direction::Back).await
    }

    /// Replays the next history entry under the current role
    pub async fn go_forward(&self) -> Result<Navigated, NavigationError> {
        self.traverse(Direction::Forward).await
    }

    async fn traverse(&self, direction: Direction) -> Result<Navigated, NavigationError> {
        let _turn = self.gate.lock().await;

        let found = {
            let state = self.read_state();
            let target = match direction {
                Direction::Back => state.history.back_target(),
                Direction::Forward => state.history.forward_target(),
            };
            target.map(|(index, entry)| {
                let target = Target {
                    path: entry.path.clone(),
                    params: entry.params.clone(),
                    query: entry.query.clone(),
                    metadata: entry.metadata.clone(),
                };
                (index, target)
            })
        };

        let Some((index, target)) = found else {
            tracing::debug!("Cannot go {}: at the end of history", direction);
            return Err(NavigationError::HistoryBoundary { direction });
        };

        self.govern(target, Commit::Traverse(index), false).await
    }

    async fn govern(
        &self,
        target: Target,
        commit: Commit,
        requires_host: bool,
    ) -> Result<Navigated, NavigationError> {
        let _loading = LoadingGuard::start(self);

        let host = self.host();
        if requires_host && host.is_none() {
            tracing::warn!("No host navigator attached; cannot navigate to {}", target.path);
            return Err(NavigationError::HostUnavailable);
        }

        let (from, role) = {
            let mut state = self.write_state();
            let from = state.current_path.clone();
            state.scroll.save(&from, self.viewport.offset());
            (from, state.role)
        };

        let context = MiddlewareContext::new(target.path.as_str(), role)
            .with_from(from)
            .with_params(target.params.clone())
            .with_query(target.query.clone())
            .with_metadata(target.metadata.clone());

        let pipeline = self
            .pipeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match pipeline.execute(&context).await {
            Ok(Verdict::Allow) => {}
            Ok(Verdict::Deny(denial)) => {
                tracing::debug!(navigation = %context.id, "Navigation aborted: {}", denial);
                return Err(NavigationError::Denied(denial));
            }
            Err(err) => return Err(self.report(NavigationError::Middleware(err))),
        }

        if let Some(host) = host {
            if let Err(err) = host.push(&context.href()).await {
                return Err(self.report(NavigationError::Host(err)));
            }
        }

        let (history_index, restored) = {
            let mut state = self.write_state();
            let restored = state.scroll.restore_target(&target.path);

            match commit {
                Commit::Push => {
                    let entry = HistoryEntry::new(target.path.as_str(), target.metadata)
                        .with_params(target.params)
                        .with_query(target.query)
                        .with_scroll_position(restored);
                    state.history.push(entry);
                }
                Commit::Traverse(index) => {
                    state.history.move_to(index);
                }
            }

            state.current_path = target.path.clone();
            (state.history.index(), restored)
        };

        self.viewport.scroll_to(restored);

        tracing::info!(
            navigation = %context.id,
            history_index,
            "Navigated to {}",
            target.path
        );

        Ok(Navigated {
            id: context.id,
            path: target.path,
            history_index,
        })
    }

    fn report(&self, error: NavigationError) -> NavigationError {
        tracing::error!("Navigation error: {}", error);
        self.events.emit_error(&error);
        error
    }

    fn set_loading(&self, loading: bool) {
        let path = {
            let mut state = self.write_state();
            state.loading = loading;
            state.current_path.clone()
        };
        self.events.emit_loading(&LoadingEvent { path, loading });
    }

    // ---- configuration ----

    /// Sets the session role; called by the auth provider
    pub fn update_role(&self, role: UserRole) {
        let previous = std::mem::replace(&mut self.write_state().role, role);
        if previous == role {
            tracing::debug!(%role, "Role unchanged");
        } else {
            tracing::debug!(from = %previous, to = %role, "Role updated");
        }
    }

    /// Appends `middleware` to the stack; it runs after everything already registered
    pub fn use_middleware(&self, middleware: Arc<dyn Middleware>) {
        self.pipeline
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(middleware);
    }

    pub fn middleware_names(&self) -> Vec<String> {
        self.pipeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Replaces the rule set of a dynamic pattern (e.g. `/posts/:postId`)
    pub fn set_validation_rules(&self, pattern: &str, rules: ValidationRules) {
        self.validation
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_rules(pattern, rules);
    }

    pub fn set_host(&self, host: Arc<dyn HostNavigator>) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = Some(host);
    }

    pub fn clear_host(&self) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn host(&self) -> Option<Arc<dyn HostNavigator>> {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---- listeners ----

    pub fn add_loading_listener(
        &self,
        listener: impl Fn(&LoadingEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let listener: LoadingListener = Arc::new(listener);
        self.events.add_loading_listener(listener)
    }

    pub fn remove_loading_listener(&self, id: ListenerId) -> bool {
        self.events.remove_loading_listener(id)
    }

    /// Registers a handler for middleware and host errors
    pub fn add_error_handler(
        &self,
        handler: impl Fn(&NavigationError) + Send + Sync + 'static,
    ) -> ListenerId {
        let handler: ErrorHandler = Arc::new(handler);
        self.events.add_error_handler(handler)
    }

    pub fn remove_error_handler(&self, id: ListenerId) -> bool {
        self.events.remove_error_handler(id)
    }

    // ---- getters ----

    pub fn current_role(&self) -> UserRole {
        self.read_state().role
    }

    pub fn current_path(&self) -> String {
        self.read_state().current_path.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumb::breadcrumbs(&self.table, &self.current_path())
    }

    /// Snapshot of all history entries, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.read_state().history.entries().cloned().collect()
    }

    pub fn history_index(&self) -> usize {
        self.read_state().history.index()
    }

    /// Metadata of the entry the history cursor is on
    pub fn current_metadata(&self) -> RouteMetadata {
        self.read_state().history.current().metadata.clone()
    }

    /// Offset stored for `path` when it was last left
    pub fn saved_scroll_position(&self, path: &str) -> Option<ScrollPosition> {
        self.read_state().scroll.get(path)
    }

    /// Shared route table, e.g. for a [`PermissionMiddleware`] installed by hand
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Every static route, marked with whether the current role may open it
    pub async fn available_routes(&self) -> Vec<AvailableRoute> {
        let (role, from) = {
            let state = self.read_state();
            (state.role, state.current_path.clone())
        };

        let mut routes = Vec::new();
        for (route, entry) in self.table.static_routes() {
            let context = MiddlewareContext::new(entry.path.as_str(), role).with_from(from.as_str());

            let mut allowed = true;
            for guard in &entry.metadata.guards {
                if !guard.can_activate(&context).await {
                    allowed = false;
                    break;
                }
            }

            routes.push(AvailableRoute {
                route: route.to_string(),
                path: entry.path.clone(),
                title: entry.metadata.title.clone(),
                allowed,
            });
        }
        routes
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Navigator")
            .field("role", &state.role)
            .field("current_path", &state.current_path)
            .field("history_index", &state.history.index())
            .field("history_len", &state.history.len())
            .field("loading", &state.loading)
            .field("events", &self.events)
            .finish()
    }
}
