use async_trait::async_trait;
use rhtmx_nav::HostNavigator;

/// Stands in for the browser: accepts every transition and logs it
pub struct LoggingHost;

#[async_trait]
impl HostNavigator for LoggingHost {
    async fn push(&self, href: &str) -> anyhow::Result<()> {
        tracing::info!("Host transition to {}", href);
        Ok(())
    }
}
