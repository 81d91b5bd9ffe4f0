use crate::domain::ports::NotificationSender;
use crate::domain::product::BrandIdentity;
use crate::error::Result;
use async_trait::async_trait;

/// Notification sender that hands the routed message to the log.
///
/// Template rendering and mail transport live outside this crate; this is the
/// sender used when running the dispatch core on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

impl LogNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, brand: BrandIdentity, to_email: &str, path_name: &str) -> Result<()> {
        tracing::info!(%brand, to = to_email, path = path_name, "notification queued");
        Ok(())
    }
}
