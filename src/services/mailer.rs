//! Transactional email through Brevo.
//!
//! The mailer is optional: without an API key it bootstraps disabled, logs a
//! warning and lets startup continue.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::MailerConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// No API key is configured.
    #[error("Email delivery is disabled (BREVO_API_KEY not set)")]
    Disabled,

    /// Transport error talking to the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the message.
    #[error("Provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A recipient or sender address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mailbox {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single transactional email.
#[derive(Debug, Clone)]
pub struct TransactionalEmail {
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: &'a Mailbox,
    to: &'a [Mailbox],
    subject: &'a str,
    html_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: String,
}

#[derive(Clone)]
struct Transport {
    http: reqwest::Client,
    api_key: Zeroizing<String>,
    endpoint: String,
    sender: Mailbox,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<Transport>,
}

impl Mailer {
    /// Builds the mailer from configuration.
    ///
    /// Never fails: a missing API key only disables delivery.
    pub fn bootstrap(config: &MailerConfig) -> Self {
        let Some(api_key) = config.api_key.clone() else {
            tracing::warn!("⚠️ BREVO_API_KEY not set, transactional email disabled");
            return Self { transport: None };
        };

        let transport = Transport {
            http: reqwest::Client::new(),
            api_key,
            endpoint: format!("{}/smtp/email", config.api_base.trim_end_matches('/')),
            sender: Mailbox {
                email: config.sender_email.clone(),
                name: Some(config.sender_name.clone()),
            },
        };

        tracing::info!("✅ Brevo mailer initialized (sender: {})", config.sender_email);
        Self {
            transport: Some(transport),
        }
    }

    /// Whether email delivery is configured.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends `email` and returns the provider's message id.
    pub async fn send(&self, email: &TransactionalEmail) -> Result<String, MailError> {
        let transport = self.transport.as_ref().ok_or(MailError::Disabled)?;

        let request = SendRequest {
            sender: &transport.sender,
            to: &email.to,
            subject: &email.subject,
            html_content: &email.html,
            text_content: email.text.as_deref(),
        };

        let response = transport
            .http
            .post(&transport.endpoint)
            .header("api-key", transport.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Brevo rejected email ({}): {}", status, body);
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response.json().await?;
        tracing::info!("📧 Email sent: {}", sent.message_id);
        Ok(sent.message_id)
    }
}
