// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{extract::State, Json};

use crate::{error::ApiError, models::ChainsResponse, state::AppState};

#[utoipa::path(
    get,
    path = "/v1/chains",
    tag = "Chains",
    responses((status = 200, body = ChainsResponse))
)]
pub async fn list_chains(State(state): State<AppState>) -> Result<Json<ChainsResponse>, ApiError> {
    Ok(Json(ChainsResponse {
        chains: state.registry.list_all().to_vec(),
    }))
}
