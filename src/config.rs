// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ALLOWED_APP_IDS` | Comma-separated tenant ids the `x-app-id` header must match | empty (any non-empty id accepted) |
//! | `OTP_HMAC_SECRET` | Key for hashing OTP codes at rest | dev fallback (warned) |
//! | `MAIL_API_URL` | Transactional-mail API endpoint | unset (log-only mail) |
//! | `MAIL_API_KEY` | Bearer token for the mail API | unset |
//! | `MAIL_FROM` | Sender address for OTP email | `no-reply@localhost` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use crate::mailer::MailerConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ALLOWED_APP_IDS_ENV: &str = "ALLOWED_APP_IDS";
pub const OTP_HMAC_SECRET_ENV: &str = "OTP_HMAC_SECRET";
pub const MAIL_API_URL_ENV: &str = "MAIL_API_URL";
pub const MAIL_API_KEY_ENV: &str = "MAIL_API_KEY";
pub const MAIL_FROM_ENV: &str = "MAIL_FROM";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_OTP_SECRET: &str = "dev-otp-secret";
const DEFAULT_MAIL_FROM: &str = "no-reply@localhost";

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Tenant ids accepted by the auth layer; empty means any non-empty
    /// `x-app-id` is accepted (development mode).
    pub allowed_app_ids: Vec<String>,
    /// HMAC key for OTP hashes at rest.
    pub otp_secret: String,
    /// Mail API settings; `None` selects the log-only mailer.
    pub mailer: Option<MailerConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var(PORT_ENV)
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let allowed_app_ids = env::var(ALLOWED_APP_IDS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let otp_secret = env::var(OTP_HMAC_SECRET_ENV).unwrap_or_else(|_| {
            tracing::warn!("{OTP_HMAC_SECRET_ENV} not set, using development fallback");
            DEFAULT_OTP_SECRET.to_string()
        });

        let mailer = match (env::var(MAIL_API_URL_ENV), env::var(MAIL_API_KEY_ENV)) {
            (Ok(api_url), Ok(api_key)) => Some(MailerConfig {
                api_url,
                api_key,
                from: env::var(MAIL_FROM_ENV).unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
            }),
            _ => None,
        };

        Self {
            host,
            port,
            allowed_app_ids,
            otp_secret,
            mailer,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_app_ids: Vec::new(),
            otp_secret: DEFAULT_OTP_SECRET.to_string(),
            mailer: None,
        }
    }
}
