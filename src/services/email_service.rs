//! Delivery of registration OTP codes.
//!
//! The transport is picked by `MAIL_TRANSPORT`: SMTP, a JSON mail API, or
//! logging only (for local development, where nothing is sent).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use reqwest::Client;
use serde_json::json;

use crate::config::{MailConfig, MailTransport};
use crate::errors::{AppError, Result};

const OTP_SUBJECT: &str = "Your Recruva verification code";

#[async_trait]
pub trait OtpMailer: Send + Sync {
    fn transport(&self) -> &'static str;

    async fn send_otp(&self, to: &str, name: &str, code: &str, valid_for: Duration) -> Result<()>;
}

pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn OtpMailer>> {
    let mailer: Arc<dyn OtpMailer> = match config.transport {
        MailTransport::Smtp => Arc::new(SmtpMailer::new(config)?),
        MailTransport::Http => Arc::new(HttpMailer::new(config)?),
        MailTransport::Log => {
            tracing::warn!("Email not configured, OTP codes will only be logged");
            Arc::new(LogMailer)
        }
    };
    Ok(mailer)
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| AppError::configuration("SMTP_HOST must be set for smtp transport"))?;

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid MAIL_FROM: {}", e)))?;

        let builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| AppError::configuration(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(config.smtp_port);

        let builder = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl OtpMailer for SmtpMailer {
    fn transport(&self) -> &'static str {
        "smtp"
    }

    async fn send_otp(&self, to: &str, name: &str, code: &str, valid_for: Duration) -> Result<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::invalid_data(format!("Invalid recipient address: {}", e)))?;

        let minutes = valid_for.num_minutes();
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(OTP_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(render_otp_text(name, code, minutes)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(render_otp_html(name, code, minutes)),
                    ),
            )
            .map_err(|e| AppError::integration(format!("Could not build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::integration(format!("SMTP error: {}", e)))?;

        tracing::info!(transport = "smtp", "OTP email sent");
        Ok(())
    }
}

/// Posts the message to a JSON mail API with a bearer key.
pub struct HttpMailer {
    client: Client,
    url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let url = config
            .api_url
            .clone()
            .ok_or_else(|| AppError::configuration("MAIL_API_URL must be set for http transport"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::configuration("MAIL_API_KEY must be set for http transport"))?;

        Ok(Self {
            client: Client::new(),
            url,
            api_key,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl OtpMailer for HttpMailer {
    fn transport(&self) -> &'static str {
        "http"
    }

    async fn send_otp(&self, to: &str, name: &str, code: &str, valid_for: Duration) -> Result<()> {
        let minutes = valid_for.num_minutes();
        let payload = json!({
            "from": self.from,
            "to": to,
            "subject": OTP_SUBJECT,
            "text": render_otp_text(name, code, minutes),
            "html": render_otp_html(name, code, minutes),
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::integration(format!("Mail API error: {}", e)))?;

        if response.status().is_success() {
            tracing::info!(transport = "http", "OTP email sent");
            Ok(())
        } else {
            Err(AppError::integration(format!(
                "Mail API rejected the message with status: {}",
                response.status()
            )))
        }
    }
}

pub struct LogMailer;

#[async_trait]
impl OtpMailer for LogMailer {
    fn transport(&self) -> &'static str {
        "log"
    }

    async fn send_otp(&self, to: &str, _name: &str, code: &str, valid_for: Duration) -> Result<()> {
        tracing::debug!(
            to = %to,
            code = %code,
            minutes = valid_for.num_minutes(),
            "OTP email not sent, mail transport is log"
        );
        Ok(())
    }
}

fn render_otp_text(name: &str, code: &str, minutes: i64) -> String {
    format!(
        "Hi {},\n\nYour Recruva verification code is: {}\n\nIt is valid for {} minutes. \
         If you did not try to create an account, you can ignore this email.\n",
        name, code, minutes
    )
}

fn render_otp_html(name: &str, code: &str, minutes: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #1f2937;">
    <p>Hi {name},</p>
    <p>Your Recruva verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
    <p>It is valid for {minutes} minutes. If you did not try to create an account, you can ignore this email.</p>
</body>
</html>"#,
        name = escape_html(name),
        code = code,
        minutes = minutes
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(transport: MailTransport) -> MailConfig {
        MailConfig {
            transport,
            from: "Recruva <no-reply@recruva.local>".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_tls: true,
            api_url: None,
            api_key: None,
        }
    }

    #[test]
    fn test_render_contains_code_and_validity() {
        let text = render_otp_text("Ada", "123456", 5);
        assert!(text.contains("123456"));
        assert!(text.contains("5 minutes"));

        let html = render_otp_html("<Ada>", "123456", 5);
        assert!(html.contains("123456"));
        assert!(html.contains("&lt;Ada&gt;"));
    }

    #[test]
    fn test_transport_requires_settings() {
        assert!(build_mailer(&mail_config(MailTransport::Smtp)).is_err());
        assert!(build_mailer(&mail_config(MailTransport::Http)).is_err());

        let mailer = build_mailer(&mail_config(MailTransport::Log)).unwrap();
        assert_eq!(mailer.transport(), "log");
    }

    #[tokio::test]
    async fn test_log_mailer_succeeds() {
        LogMailer
            .send_otp("a@x.com", "Ada", "123456", Duration::minutes(5))
            .await
            .unwrap();
    }
}
