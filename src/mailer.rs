// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Outbound email delivery for the OTP flow.
//!
//! Delivery goes through a transactional-mail HTTP API configured from the
//! environment. Without configuration the service falls back to a log-only
//! mailer, which is the expected mode for development and tests.

use std::time::Duration;

use serde_json::json;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Mail API connection parameters.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Endpoint of the transactional-mail API (POST, JSON body)
    pub api_url: String,
    /// Bearer token for the API
    pub api_key: String,
    /// Sender address
    pub from: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail API request failed: {0}")]
    Request(String),

    #[error("Mail API returned {0}")]
    Rejected(String),
}

/// Email dispatcher.
pub enum Mailer {
    /// Send through the configured HTTP mail API.
    Http(HttpMailer),
    /// Log-only mode; nothing leaves the process.
    Log,
}

impl Mailer {
    pub fn from_config(config: Option<MailerConfig>) -> Result<Self, MailerError> {
        match config {
            Some(config) => Ok(Mailer::Http(HttpMailer::new(config)?)),
            None => Ok(Mailer::Log),
        }
    }

    /// Send a verification code to `to`.
    pub async fn send_otp(&self, to: &str, code: &str) -> Result<(), MailerError> {
        match self {
            Mailer::Http(mailer) => mailer.send_otp(to, code).await,
            Mailer::Log => {
                // The code itself stays out of the logs.
                tracing::info!(%to, "OTP issued (mail delivery disabled)");
                Ok(())
            }
        }
    }
}

/// HTTP mail API client.
pub struct HttpMailer {
    config: MailerConfig,
    http: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| MailerError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    async fn send_otp(&self, to: &str, code: &str) -> Result<(), MailerError> {
        let body = json!({
            "from": self.config.from,
            "to": to,
            "subject": "Your wallet verification code",
            "text": format!(
                "Your verification code is {code}. It expires in {} minutes.",
                crate::otp::OTP_TTL_MINUTES
            ),
        });

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailerError::Rejected(response.status().to_string()));
        }

        tracing::info!(%to, "Sent OTP email");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = Mailer::from_config(None).unwrap();
        assert!(mailer.send_otp("user@example.com", "123456").await.is_ok());
    }
}
