// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::AppTenant,
    balance::{BalanceEntry, BalanceScope},
    error::ApiError,
    models::{BalancesResponse, StellarBalancesRequest, StellarBalancesResponse},
    state::AppState,
    wallet::stellar::account_id_from_secret,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceParams {
    /// Comma-separated chain ids to restrict the query to, e.g. `8453,10`
    pub chains: Option<String>,
}

fn parse_chain_ids(raw: &str) -> Result<Vec<u64>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| ApiError::bad_request(format!("Invalid chain id: {part}")))
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/v1/balances/{address}",
    params(
        ("address" = String, Path, description = "EVM address (0x...)"),
        BalanceParams
    ),
    tag = "Balances",
    security(("app_id" = [])),
    responses(
        (status = 200, body = BalancesResponse),
        (status = 400, description = "Malformed address or chain filter")
    )
)]
pub async fn get_evm_balances(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Path(address): Path<String>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let chain_ids = match params.chains.as_deref() {
        Some(raw) => Some(parse_chain_ids(raw)?),
        None => None,
    };

    let balances = state
        .balances
        .balances(BalanceScope::Evm {
            address: address.clone(),
            chain_ids,
        })
        .await?;

    Ok(Json(BalancesResponse { address, balances }))
}

#[utoipa::path(
    get,
    path = "/v1/balances/{address}/{chain_id}",
    params(
        ("address" = String, Path, description = "EVM address (0x...)"),
        ("chain_id" = u64, Path, description = "EVM chain id")
    ),
    tag = "Balances",
    security(("app_id" = [])),
    responses(
        (status = 200, body = BalanceEntry),
        (status = 400, description = "Unknown chain or malformed address"),
        (status = 503, description = "RPC query failed")
    )
)]
pub async fn get_evm_chain_balance(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Path((address, chain_id)): Path<(String, u64)>,
) -> Result<Json<BalanceEntry>, ApiError> {
    let entry = state.balances.evm_balance(&address, chain_id).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    post,
    path = "/v1/balances/stellar",
    request_body = StellarBalancesRequest,
    tag = "Balances",
    security(("app_id" = [])),
    responses(
        (status = 200, body = StellarBalancesResponse),
        (status = 400, description = "Malformed secret or unknown network variant")
    )
)]
pub async fn get_stellar_balances(
    State(state): State<AppState>,
    AppTenant(_tenant): AppTenant,
    Json(request): Json<StellarBalancesRequest>,
) -> Result<Json<StellarBalancesResponse>, ApiError> {
    let account_id = account_id_from_secret(&request.secret)
        .map_err(|e| ApiError::bad_request(format!("Invalid Stellar secret: {e}")))?;

    let balances = state
        .balances
        .balances(BalanceScope::Stellar {
            secret: request.secret,
            networks: request.networks,
        })
        .await?;

    Ok(Json(StellarBalancesResponse {
        account_id,
        balances,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;

    #[test]
    fn parse_chain_ids_accepts_comma_list() {
        assert_eq!(parse_chain_ids("8453,10").unwrap(), vec![8453, 10]);
        assert_eq!(parse_chain_ids(" 1 , 137 ").unwrap(), vec![1, 137]);
    }

    #[test]
    fn parse_chain_ids_rejects_garbage() {
        assert!(parse_chain_ids("8453,abc").is_err());
    }

    #[tokio::test]
    async fn stellar_balances_reject_malformed_secret() {
        let state = AppState::new(Config::default()).expect("state builds");
        let err = get_stellar_balances(
            State(state),
            AppTenant("test-app".to_string()),
            Json(StellarBalancesRequest {
                secret: "not-a-seed".to_string(),
                networks: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn single_chain_balance_rejects_unknown_chain() {
        let state = AppState::new(Config::default()).expect("state builds");
        let err = get_evm_chain_balance(
            State(state),
            AppTenant("test-app".to_string()),
            Path(("0x9858EfFD232B4033E47d90003D41EC34EcaEda94".to_string(), 999999)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evm_balances_reject_bad_chain_filter() {
        let state = AppState::new(Config::default()).expect("state builds");
        let err = get_evm_balances(
            State(state),
            AppTenant("test-app".to_string()),
            Path("0x9858EfFD232B4033E47d90003D41EC34EcaEda94".to_string()),
            Query(BalanceParams {
                chains: Some("10,oops".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
