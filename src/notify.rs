//! SES notification email
//!
//! Sends a single email with recipient, sender, subject, and body taken
//! from the config. An SES rejection is an expected operational outcome
//! (sandbox accounts, unverified identities), so the provider's message
//! is printed and the process exits normally. No retry.

use crate::config::Config;
use crate::ec2_utils::sdk_config_for_region;
use crate::error::{FleetctlError, Result};
use aws_sdk_sesv2::error::ProvideErrorMetadata;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;
use tracing::info;

const CHARSET: &str = "UTF-8";

/// What became of the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// SES accepted the message and assigned this id
    Sent { message_id: String },
    /// SES rejected the message; the provider's reason, verbatim
    Rejected { reason: String },
}

/// Send the configured notification email
///
/// Prints the SES message id on success. On rejection the provider's
/// error message is surfaced and the process still exits zero: a failed
/// notification is reported, not fatal.
pub async fn send_notification(config: &Config) -> Result<()> {
    let sdk_config = sdk_config_for_region(&config.email.region).await;
    let client = SesClient::new(&sdk_config);

    match send_with_client(&client, config).await? {
        NotifyOutcome::Sent { message_id } => {
            println!("Email sent! Message ID: {}", message_id);
        }
        NotifyOutcome::Rejected { reason } => {
            println!("{}", reason);
        }
    }
    Ok(())
}

/// Issue the SendEmail call and classify the result
///
/// A service-level rejection becomes `NotifyOutcome::Rejected` rather
/// than an error, so callers never treat it as a fault.
pub async fn send_with_client(client: &SesClient, config: &Config) -> Result<NotifyOutcome> {
    let email = &config.email;

    let destination = Destination::builder().to_addresses(&email.to).build();

    let subject = Content::builder()
        .data(&email.subject)
        .charset(CHARSET)
        .build()
        .map_err(|e| FleetctlError::Ses(format!("Invalid subject: {}", e)))?;

    let body_html = Content::builder()
        .data(&email.body_html)
        .charset(CHARSET)
        .build()
        .map_err(|e| FleetctlError::Ses(format!("Invalid body: {}", e)))?;

    let message = Message::builder()
        .subject(subject)
        .body(Body::builder().html(body_html).build())
        .build();

    let content = EmailContent::builder().simple(message).build();

    info!("Sending notification to {} via SES ({})", email.to, email.region);

    match client
        .send_email()
        .from_email_address(&email.from)
        .destination(destination)
        .content(content)
        .send()
        .await
    {
        Ok(output) => Ok(NotifyOutcome::Sent {
            message_id: output.message_id().unwrap_or("unknown").to_string(),
        }),
        Err(e) => {
            let service_err = e.into_service_error();
            let reason = service_err
                .message()
                .map(|m| m.to_string())
                .unwrap_or_else(|| service_err.to_string());
            Ok(NotifyOutcome::Rejected { reason })
        }
    }
}
