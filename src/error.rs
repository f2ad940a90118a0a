// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::balance::BalanceError;
use crate::wallet::WalletError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match &err {
            WalletError::Derivation(_) => ApiError::unprocessable(err.to_string()),
            WalletError::InvalidCount(_) => ApiError::bad_request(err.to_string()),
            WalletError::InconsistentDerivation | WalletError::BatchGenerationFailed { .. } => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        match &err {
            BalanceError::UnsupportedChain(_)
            | BalanceError::UnsupportedNetwork(_)
            | BalanceError::InvalidAddressFormat(_)
            | BalanceError::InvalidSecret(_) => ApiError::bad_request(err.to_string()),
            BalanceError::InvalidRpcUrl(_)
            | BalanceError::BalanceFetchFailed { .. }
            | BalanceError::FaucetFundingFailed { .. } => {
                ApiError::service_unavailable(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let conflict = ApiError::conflict("exists");
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let unavailable = ApiError::service_unavailable("down");
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn wallet_errors_map_to_statuses() {
        let err: ApiError = WalletError::InvalidCount(0).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = WalletError::Derivation("bad mnemonic".into()).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = WalletError::InconsistentDerivation.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn balance_errors_map_to_statuses() {
        let err: ApiError = BalanceError::UnsupportedChain(999999).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = BalanceError::BalanceFetchFailed {
            chain_id: 1,
            address: "0xabc".into(),
            cause: "timeout".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
