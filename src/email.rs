//! SMTP delivery for the daily report
//!
//! The password is read from the environment variable named in config
//! (`password_env`, default INFRACTL_SMTP_PASSWORD) and is never written to
//! the config file. A missing variable fails before any connection is made.

use crate::config::EmailConfig;
use crate::error::{ConfigError, InfractlError, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

pub fn send_email(subject: &str, body: &str, recipient: &str, config: &EmailConfig) -> Result<()> {
    if config.sender.is_empty() {
        return Err(ConfigError::MissingField("email.sender".to_string()).into());
    }

    let password = std::env::var(&config.password_env).map_err(|_| {
        ConfigError::MissingField(format!(
            "SMTP password: set the {} environment variable",
            config.password_env
        ))
    })?;

    let from: Mailbox = config.sender.parse().map_err(|e| InfractlError::Validation {
        field: "email.sender".to_string(),
        reason: format!("{}", e),
    })?;
    let to: Mailbox = recipient.parse().map_err(|e| InfractlError::Validation {
        field: "recipient".to_string(),
        reason: format!("{}", e),
    })?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| InfractlError::Email(format!("Failed to build message: {}", e)))?;

    let mailer = SmtpTransport::starttls_relay(&config.smtp_host)
        .map_err(|e| InfractlError::Email(format!("Failed to connect to SMTP relay: {}", e)))?
        .port(config.smtp_port)
        .credentials(Credentials::new(config.sender.clone(), password))
        .build();

    mailer
        .send(&message)
        .map_err(|e| InfractlError::Email(format!("Failed to send email: {}", e)))?;

    info!("Email sent to {}", recipient);
    println!("Email sent successfully to {}", recipient);
    Ok(())
}
