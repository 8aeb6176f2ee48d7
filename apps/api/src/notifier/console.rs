use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{Delivery, NotificationSink, NotifyError, OutgoingEmail};

/// Logs messages instead of sending them. Used when no mail transport is
/// configured so the service stays usable without credentials.
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, NotifyError> {
        info!(
            to = %email.to_header(),
            subject = %email.subject,
            "EMAIL NOTIFICATION (not sent - no transport configured)\n{}",
            email.text
        );

        Ok(Delivery {
            message_id: format!("mock-{}", Utc::now().timestamp_millis()),
            detail: "Email logged (transport not configured)".to_string(),
        })
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}
