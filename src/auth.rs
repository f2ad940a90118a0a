// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Application-tenant authentication.
//!
//! Every wallet route requires an `x-app-id` header identifying the calling
//! application. Use the `AppTenant` extractor in handlers:
//!
//! ```rust,ignore
//! async fn my_handler(AppTenant(app_id): AppTenant) -> impl IntoResponse {
//!     // app_id is the validated tenant id
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

/// Header carrying the application tenant id.
pub const APP_ID_HEADER: &str = "x-app-id";

/// Tenant authentication errors.
#[derive(Debug)]
pub enum AuthError {
    /// No `x-app-id` header present, or it is empty
    MissingAppId,
    /// The tenant id is not in the configured allow-list
    UnknownAppId,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAppId => "missing_app_id",
            AuthError::UnknownAppId => "unknown_app_id",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAppId => write!(f, "The {APP_ID_HEADER} header is required"),
            AuthError::UnknownAppId => write!(f, "Unknown application id"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extractor for the validated application tenant.
///
/// With `ALLOWED_APP_IDS` configured, the header value must match one of the
/// listed ids. Without it (development mode), any non-empty id is accepted.
#[derive(Debug)]
pub struct AppTenant(pub String);

impl FromRequestParts<AppState> for AppTenant {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(APP_ID_HEADER)
            .ok_or(AuthError::MissingAppId)?
            .to_str()
            .map_err(|_| AuthError::MissingAppId)?
            .trim();

        if value.is_empty() {
            return Err(AuthError::MissingAppId);
        }

        let allowed = &state.config.allowed_app_ids;
        if !allowed.is_empty() && !allowed.iter().any(|id| id == value) {
            return Err(AuthError::UnknownAppId);
        }

        Ok(AppTenant(value.to_string()))
    }
}
