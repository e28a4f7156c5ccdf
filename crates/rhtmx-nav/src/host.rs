//! Host page-transition collaborator
//!
//! The navigator decides *whether* a transition happens; the host performs
//! it (swap the page, update the address bar, ...).

use async_trait::async_trait;

/// Performs the actual page transition
#[async_trait]
pub trait HostNavigator: Send + Sync {
    /// Shows `href` (path plus query string).
    ///
    /// An error aborts the navigation before any router state changes.
    async fn push(&self, href: &str) -> anyhow::Result<()>;
}
