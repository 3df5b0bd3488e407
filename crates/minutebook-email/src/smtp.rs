// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP implementation of the DeliveryAdapter trait.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use minutebook_config::model::SmtpConfig;
use minutebook_core::{
    AdapterType, DeliveryAdapter, DeliveryRequest, HealthStatus, MinutebookError, PluginAdapter,
};

const FALLBACK_TEXT: &str = "The meeting report is attached.";

/// Delivers reports through an SMTP relay.
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpDelivery {
    /// Build the transport from configuration.
    ///
    /// Fails when no host or sender is configured. No connection is made
    /// until the first delivery or health check.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MinutebookError> {
        let host = config
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| MinutebookError::Config("smtp.host is not set".to_string()))?;
        let from = config
            .from_address
            .as_deref()
            .ok_or_else(|| MinutebookError::Config("smtp.from_address is not set".to_string()))?
            .parse::<Mailbox>()
            .map_err(|e| MinutebookError::Config(format!("smtp.from_address is invalid: {e}")))?;

        let relay = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        };
        let builder =
            relay.map_err(|e| MinutebookError::Config(format!("smtp relay {host}: {e}")))?;

        let builder = builder.port(config.port);
        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        debug!(host, port = config.port, starttls = config.starttls, "SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
            from,
            host: host.to_string(),
        })
    }
}

/// Assemble the mail for one delivery request.
///
/// Every recipient must be a valid address; the artifact's content type must
/// be a valid MIME type.
pub fn build_message(from: &Mailbox, request: &DeliveryRequest) -> Result<Message, MinutebookError> {
    if request.recipients.is_empty() {
        return Err(MinutebookError::InvalidInput(
            "at least one recipient is required".to_string(),
        ));
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(request.subject.clone());
    for recipient in &request.recipients {
        let mailbox = recipient.trim().parse::<Mailbox>().map_err(|e| {
            MinutebookError::InvalidInput(format!("invalid recipient `{recipient}`: {e}"))
        })?;
        builder = builder.to(mailbox);
    }

    let content_type = ContentType::parse(&request.artifact.content_type).map_err(|e| {
        MinutebookError::InvalidInput(format!(
            "invalid artifact content type `{}`: {e}",
            request.artifact.content_type
        ))
    })?;
    let plain = html2text::from_read(request.body_html.as_bytes(), 80)
        .map(|text| text.trim().to_string())
        .ok()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_TEXT.to_string());

    let attachment = Attachment::new(request.filename.clone())
        .body(request.artifact.bytes.clone(), content_type);
    builder
        .multipart(
            MultiPart::mixed()
                .multipart(MultiPart::alternative_plain_html(
                    plain,
                    request.body_html.clone(),
                ))
                .singlepart(attachment),
        )
        .map_err(|e| MinutebookError::Delivery {
            message: format!("failed to build message: {e}"),
            source: Some(Box::new(e)),
        })
}

#[async_trait]
impl PluginAdapter for SmtpDelivery {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Unhealthy(format!(
                "SMTP relay {} did not accept the connection",
                self.host
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("SMTP relay {}: {e}", self.host))),
        }
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        Ok(())
    }
}

#[async_trait]
impl DeliveryAdapter for SmtpDelivery {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), MinutebookError> {
        let message = build_message(&self.from, request)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MinutebookError::Delivery {
                message: format!("SMTP relay {} rejected the message: {e}", self.host),
                source: Some(Box::new(e)),
            })?;
        info!(
            host = %self.host,
            recipients = request.recipients.len(),
            filename = %request.filename,
            "report mailed"
        );
        Ok(())
    }
}
