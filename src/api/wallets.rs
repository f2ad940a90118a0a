// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::AppTenant,
    error::ApiError,
    models::{
        BatchGenerateRequest, BatchGenerateResponse, CreateWalletRequest, CreateWalletResponse,
        ImportWalletRequest, RecoverWalletRequest, RequestOtpRequest, RequestOtpResponse,
        ValidateAddressRequest, ValidateAddressResponse, WalletMaterialResponse,
        WalletRecordResponse,
    },
    otp,
    state::AppState,
    store::{normalize_identifier, WalletRecord},
};

#[utoipa::path(
    post,
    path = "/v1/wallets/otp",
    request_body = RequestOtpRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses(
        (status = 200, body = RequestOtpResponse),
        (status = 400, description = "Missing identifier"),
        (status = 401, description = "Missing or unknown app id"),
        (status = 503, description = "Mail delivery failed")
    )
)]
pub async fn request_otp(
    State(state): State<AppState>,
    AppTenant(app_id): AppTenant,
    Json(request): Json<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, ApiError> {
    let identifier = normalize_identifier(&request.identifier);
    if identifier.is_empty() {
        return Err(ApiError::bad_request("identifier is required"));
    }

    let code = otp::generate_code();
    let otp_hash = otp::hash_code(&state.config.otp_secret, &identifier, &code);
    let expires_at = otp::expiry_timestamp();

    state
        .mailer
        .send_otp(&identifier, &code)
        .await
        .map_err(|e| {
            tracing::warn!(%identifier, error = %e, "OTP delivery failed");
            ApiError::service_unavailable("Could not deliver the verification code")
        })?;

    // Only store the hash once delivery succeeded, so a failed send cannot
    // invalidate a previously issued code.
    let mut store = state.store.write().await;
    store.set_pending_otp(&app_id, &identifier, otp_hash, expires_at);

    Ok(Json(RequestOtpResponse {
        message: "Verification code sent".to_string(),
        expires_in_minutes: otp::OTP_TTL_MINUTES,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/wallets",
    request_body = CreateWalletRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses(
        (status = 201, body = CreateWalletResponse),
        (status = 401, description = "Missing or unknown app id, or invalid OTP"),
        (status = 409, description = "Wallet already exists for this identifier and network"),
        (status = 422, description = "Invalid mnemonic")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    AppTenant(app_id): AppTenant,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(axum::http::StatusCode, Json<CreateWalletResponse>), ApiError> {
    let identifier = normalize_identifier(&request.identifier);
    if identifier.is_empty() {
        return Err(ApiError::bad_request("identifier is required"));
    }

    {
        let mut store = state.store.write().await;
        let pending = store
            .pending_otp(&app_id, &identifier)
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("No pending verification code"))?;

        if pending.expires_at < chrono::Utc::now() {
            store.clear_pending_otp(&app_id, &identifier);
            return Err(ApiError::unauthorized("Verification code expired"));
        }
        if !otp::verify_code(
            &state.config.otp_secret,
            &identifier,
            &request.otp,
            &pending.otp_hash,
        ) {
            return Err(ApiError::unauthorized("Invalid verification code"));
        }
        store.clear_pending_otp(&app_id, &identifier);
    }

    let info = state
        .wallets
        .generate(request.network, request.mnemonic.as_deref())?;
    let record = WalletRecord::from_wallet_info(&app_id, &identifier, &info);
    let response = CreateWalletResponse {
        wallet: WalletRecordResponse::from(&record),
        mnemonic: info.mnemonic,
    };

    let mut store = state.store.write().await;
    store.insert_wallet(record)?;

    tracing::info!(%identifier, network = %request.network, "Created wallet");
    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListWalletsParams {
    /// End-user email address
    pub identifier: String,
}

#[utoipa::path(
    get,
    path = "/v1/wallets",
    params(ListWalletsParams),
    tag = "Wallets",
    security(("app_id" = [])),
    responses((status = 200, body = [WalletRecordResponse]))
)]
pub async fn list_wallets(
    State(state): State<AppState>,
    AppTenant(app_id): AppTenant,
    Query(params): Query<ListWalletsParams>,
) -> Result<Json<Vec<WalletRecordResponse>>, ApiError> {
    let identifier = normalize_identifier(&params.identifier);
    let store = state.store.read().await;
    let wallets = store
        .wallets_for_user(&app_id, &identifier)
        .iter()
        .map(WalletRecordResponse::from)
        .collect();
    Ok(Json(wallets))
}

#[utoipa::path(
    post,
    path = "/v1/wallets/recover",
    request_body = RecoverWalletRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses(
        (status = 200, body = WalletMaterialResponse),
        (status = 422, description = "Invalid mnemonic")
    )
)]
pub async fn recover_wallet(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Json(request): Json<RecoverWalletRequest>,
) -> Result<Json<WalletMaterialResponse>, ApiError> {
    let info = state
        .wallets
        .recover_from_mnemonic(&request.mnemonic, request.network)?;
    Ok(Json(info.into()))
}

#[utoipa::path(
    post,
    path = "/v1/wallets/import",
    request_body = ImportWalletRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses(
        (status = 200, body = WalletMaterialResponse),
        (status = 422, description = "Invalid private key")
    )
)]
pub async fn import_wallet(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Json(request): Json<ImportWalletRequest>,
) -> Result<Json<WalletMaterialResponse>, ApiError> {
    let info = state
        .wallets
        .import_from_secret(&request.private_key, request.network)?;
    Ok(Json(info.into()))
}

#[utoipa::path(
    post,
    path = "/v1/wallets/batch",
    request_body = BatchGenerateRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses(
        (status = 200, body = BatchGenerateResponse),
        (status = 400, description = "Count outside 1..=100")
    )
)]
pub async fn batch_generate(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Json(request): Json<BatchGenerateRequest>,
) -> Result<Json<BatchGenerateResponse>, ApiError> {
    let wallets = state
        .wallets
        .generate_batch(request.count, request.network)?;
    let wallets: Vec<WalletMaterialResponse> = wallets.into_iter().map(Into::into).collect();
    let count = wallets.len();
    Ok(Json(BatchGenerateResponse { wallets, count }))
}

#[utoipa::path(
    post,
    path = "/v1/wallets/validate",
    request_body = ValidateAddressRequest,
    tag = "Wallets",
    security(("app_id" = [])),
    responses((status = 200, body = ValidateAddressResponse))
)]
pub async fn validate_address(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Json(request): Json<ValidateAddressRequest>,
) -> Result<Json<ValidateAddressResponse>, ApiError> {
    let valid = state
        .wallets
        .validate_address(&request.address, request.network);
    Ok(Json(ValidateAddressResponse {
        address: request.address,
        network: request.network,
        valid,
    }))
}
