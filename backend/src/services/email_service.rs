//! Outbound email through the SendGrid v3 mail API.
//!
//! Services depend on the [`Mailer`] trait; [`EmailService`] is the
//! production implementation. Outside production every message is sent with
//! SendGrid's sandbox mode enabled, so it is validated but never delivered.

use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the link that confirms ownership of `email`.
    async fn send_verification_email(&self, email: &str, first_name: &str) -> ServiceResult<()>;

    async fn send_password_reset_email(
        &self,
        email: &str,
        first_name: &str,
        reset_token: &str,
    ) -> ServiceResult<()>;
}

pub struct EmailService {
    http_client: Client,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::internal_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn verification_link(&self, email: &str) -> String {
        format!("{}/user/verify_mail/{}", self.config.base_url, email)
    }

    pub fn password_reset_link(&self, reset_token: &str) -> String {
        format!(
            "{}/user/reset-password?token={}",
            self.config.base_url, reset_token
        )
    }

    /// Builds the SendGrid request body for one message.
    pub fn build_payload(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": to_email }] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": subject,
            "content": [
                { "type": "text/plain", "value": text_content },
                { "type": "text/html", "value": html_content },
            ],
            "mail_settings": {
                "sandbox_mode": { "enable": self.config.sandbox }
            }
        })
    }

    /// Sends a generic email
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> ServiceResult<()> {
        let payload = self.build_payload(to_email, subject, html_content, text_content);

        let response = self
            .http_client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::internal_error(format!("Failed to send email: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::internal_error(format!(
                "Email provider rejected message with status {status}: {body}"
            )));
        }

        Ok(())
    }

    fn build_verification_html(&self, first_name: &str, link: &str) -> String {
        format!(
            r#"
            <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
                <h2 style="color: #333;">Welcome to Assure Health, {first_name}!</h2>
                <p>Thank you for signing up. Please verify your email address by clicking the button below:</p>
                <a href="{link}" style="display: inline-block; padding: 12px 24px; background-color: #007bff; color: white; text-decoration: none; border-radius: 4px; margin: 20px 0;">
                    Verify Email Address
                </a>
                <p>Or copy and paste this link in your browser:</p>
                <p><a href="{link}">{link}</a></p>
                <p>If you didn't create this account, please ignore this email.</p>
            </div>
            "#
        )
    }

    fn build_password_reset_html(&self, first_name: &str, link: &str) -> String {
        format!(
            r#"
            <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
                <h2 style="color: #333;">Password Reset Request</h2>
                <p>Hello {first_name},</p>
                <p>We received a request to reset your password. Click the button below to reset it:</p>
                <a href="{link}" style="display: inline-block; padding: 12px 24px; background-color: #dc3545; color: white; text-decoration: none; border-radius: 4px; margin: 20px 0;">
                    Reset Password
                </a>
                <p>Or copy and paste this link in your browser:</p>
                <p><a href="{link}">{link}</a></p>
                <p><strong>This link will expire in 1 hour.</strong></p>
                <p>If you didn't request this password reset, please ignore this email.</p>
            </div>
            "#
        )
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send_verification_email(&self, email: &str, first_name: &str) -> ServiceResult<()> {
        let link = self.verification_link(email);
        let text = format!(
            "{first_name}, Please click the following link to confirm your email address:\n\n{link}"
        );
        let html = self.build_verification_html(first_name, &link);

        self.send_email(email, "Verification Email", &html, &text)
            .await?;
        tracing::info!("Verification email sent to {}", email);
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        first_name: &str,
        reset_token: &str,
    ) -> ServiceResult<()> {
        let link = self.password_reset_link(reset_token);
        let text = format!(
            "{first_name}, Please click the following link to reset your password:\n\n{link}\n\nThis link will expire in 1 hour."
        );
        let html = self.build_password_reset_html(first_name, &link);

        self.send_email(email, "Password Reset Request", &html, &text)
            .await?;
        tracing::info!("Password reset email sent to {}", email);
        Ok(())
    }
}
