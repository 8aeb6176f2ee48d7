use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{Delivery, NotificationSink, NotifyError, OutgoingEmail};
use crate::config::EmailSettings;
use crate::models::generate_id;

/// STARTTLS SMTP relay with username/password authentication.
pub struct SmtpSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpSink {
    pub fn new(settings: &EmailSettings) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            host: settings.host.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for SmtpSink {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, NotifyError> {
        let message_id = format!("<{}@{}>", generate_id(), sender_domain(&email.from));
        let message = build_message(email, &message_id)?;

        self.transport.send(message).await?;
        info!("Email sent successfully: {message_id}");

        Ok(Delivery {
            message_id,
            detail: "Email sent successfully".to_string(),
        })
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(NotifyError::Unreachable(self.host.clone()))
        }
    }
}

fn build_message(email: &OutgoingEmail, message_id: &str) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .message_id(Some(message_id.to_string()));

    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    Ok(builder.multipart(MultiPart::alternative_plain_html(
        email.text.clone(),
        email.html.clone(),
    ))?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Address(format!("{address}: {e}")))
}

fn sender_domain(from: &str) -> &str {
    from.rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>'))
        .unwrap_or("localhost")
}
