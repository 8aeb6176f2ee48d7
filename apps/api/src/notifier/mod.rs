//! Notification delivery — the only path by which mail leaves the service.
//!
//! `Notifier` composes messages and hands them to a `NotificationSink`
//! selected once at startup: `SmtpSink` when mail settings are complete,
//! `ConsoleSink` otherwise. Delivery outcomes are always returned as a
//! `DeliveryResult`; a failed send never aborts the surrounding request.

pub mod compose;
pub mod console;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::EmailSettings;
use crate::models::Application;

pub use compose::OutgoingEmail;
pub use console::ConsoleSink;
pub use smtp::SmtpSink;

const CONSOLE_SENDER: &str = "notifications@localhost";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email transport not configured")]
    NotConfigured,

    #[error("Invalid address {0}")]
    Address(String),

    #[error("Could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("SMTP server {0} did not accept the connection test")]
    Unreachable(String),
}

/// What a sink reports after accepting a message.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_id: String,
    pub detail: String,
}

/// Outbound mail capability. Carried in `Notifier` as `Arc<dyn NotificationSink>`.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short label for logs ("smtp", "console").
    fn name(&self) -> &'static str;

    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, NotifyError>;

    async fn verify(&self) -> Result<(), NotifyError>;
}

/// Result of a send attempt, serialized into API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    from: String,
    app_name: String,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, from: String, app_name: String) -> Self {
        Self {
            sink,
            from,
            app_name,
        }
    }

    /// Picks the SMTP sink when mail settings are present and usable, the
    /// console sink otherwise.
    pub fn from_settings(settings: Option<&EmailSettings>, app_name: &str) -> Self {
        let Some(settings) = settings else {
            warn!("Email configuration not found. Email notifications will be logged only.");
            return Self::console(app_name);
        };

        match SmtpSink::new(settings) {
            Ok(sink) => {
                info!("Email transport initialized ({}:{})", settings.host, settings.port);
                Self::new(Arc::new(sink), settings.from.clone(), app_name.to_string())
            }
            Err(e) => {
                error!("Failed to initialize email transport: {e}. Falling back to console logging.");
                Self::console(app_name)
            }
        }
    }

    pub fn console(app_name: &str) -> Self {
        Self::new(
            Arc::new(ConsoleSink),
            CONSOLE_SENDER.to_string(),
            app_name.to_string(),
        )
    }

    pub fn transport_name(&self) -> &'static str {
        self.sink.name()
    }

    /// `recipients` is used as given: executives first, then project leads,
    /// without deduplication.
    pub async fn send_application_notification(
        &self,
        application: &Application,
        recipients: &[String],
    ) -> DeliveryResult {
        let email = OutgoingEmail {
            from: self.from.clone(),
            to: recipients.to_vec(),
            subject: compose::subject(application),
            text: compose::text_body(application, &self.app_name),
            html: compose::html_body(application, &self.app_name),
        };
        self.send_email(&email).await
    }

    pub async fn send_email(&self, email: &OutgoingEmail) -> DeliveryResult {
        match self.sink.deliver(email).await {
            Ok(delivery) => DeliveryResult {
                success: true,
                message: delivery.detail,
                message_id: Some(delivery.message_id),
                error: None,
            },
            Err(e) => {
                error!("Failed to send email via {}: {e}", self.sink.name());
                DeliveryResult {
                    success: false,
                    message: e.to_string(),
                    message_id: None,
                    error: Some(format!("{e:?}")),
                }
            }
        }
    }

    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.sink.verify().await {
            Ok(()) => ConnectionStatus {
                success: true,
                message: "Email service connection successful".to_string(),
            },
            Err(e) => {
                warn!("Email connection test failed: {e}");
                ConnectionStatus {
                    success: false,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// In-memory sinks for tests.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail: bool,
    }

    impl RecordingSink {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, NotifyError> {
            if self.fail {
                return Err(NotifyError::Unreachable("smtp.test".to_string()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(Delivery {
                message_id: format!("rec-{}", self.sent.lock().unwrap().len()),
                detail: "Email sent successfully".to_string(),
            })
        }

        async fn verify(&self) -> Result<(), NotifyError> {
            if self.fail {
                Err(NotifyError::Unreachable("smtp.test".to_string()))
            } else {
                Ok(())
            }
        }
    }
}
