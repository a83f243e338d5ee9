use async_trait::async_trait;
use tracing::info;

use nh_core::{ReportTransport, Result};

/// Transport that logs deliveries instead of sending them anywhere.
/// Stands in where no mail relay is configured.
pub struct LoggingTransport;

#[async_trait]
impl ReportTransport for LoggingTransport {
    async fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        info!(subject, bytes = body.len(), "report ready for delivery");
        Ok(())
    }
}
