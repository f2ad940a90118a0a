// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::APP_ID_HEADER;

use crate::{
    balance::BalanceEntry,
    chains::{ChainConfig, NativeCurrency},
    models::{
        BalancesResponse, BatchGenerateRequest, BatchGenerateResponse, ChainsResponse,
        CreateWalletRequest, CreateWalletResponse, ImportWalletRequest, RecoverWalletRequest,
        RequestOtpRequest,
        RequestOtpResponse, StellarBalancesRequest, StellarBalancesResponse,
        ValidateAddressRequest, ValidateAddressResponse, WalletMaterialResponse,
        WalletRecordResponse,
    },
    state::AppState,
    wallet::NetworkFamily,
};

pub mod balances;
pub mod chains;
pub mod health;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/wallets",
            get(wallets::list_wallets).post(wallets::create_wallet),
        )
        .route("/wallets/otp", post(wallets::request_otp))
        .route("/wallets/recover", post(wallets::recover_wallet))
        .route("/wallets/import", post(wallets::import_wallet))
        .route("/wallets/batch", post(wallets::batch_generate))
        .route("/wallets/validate", post(wallets::validate_address))
        .route("/chains", get(chains::list_chains))
        .route("/balances/{address}", get(balances::get_evm_balances))
        .route(
            "/balances/{address}/{chain_id}",
            get(balances::get_evm_chain_balance),
        )
        .route("/balances/stellar", post(balances::get_stellar_balances))
        .with_state(state.clone());

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallets::request_otp,
        wallets::create_wallet,
        wallets::list_wallets,
        wallets::recover_wallet,
        wallets::import_wallet,
        wallets::batch_generate,
        wallets::validate_address,
        chains::list_chains,
        balances::get_evm_balances,
        balances::get_evm_chain_balance,
        balances::get_stellar_balances,
        health::health_check,
        health::liveness_check
    ),
    components(
        schemas(
            RequestOtpRequest,
            RequestOtpResponse,
            CreateWalletRequest,
            CreateWalletResponse,
            WalletRecordResponse,
            RecoverWalletRequest,
            ImportWalletRequest,
            WalletMaterialResponse,
            BatchGenerateRequest,
            BatchGenerateResponse,
            ValidateAddressRequest,
            ValidateAddressResponse,
            StellarBalancesRequest,
            StellarBalancesResponse,
            BalancesResponse,
            BalanceEntry,
            ChainsResponse,
            ChainConfig,
            NativeCurrency,
            NetworkFamily,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Wallets", description = "Wallet generation, recovery and import"),
        (name = "Balances", description = "Native balance aggregation"),
        (name = "Chains", description = "Supported chain metadata"),
        (name = "Health", description = "Service probes")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "app_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(APP_ID_HEADER))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let state = AppState::new(Config::default()).expect("state builds");
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_schema_components_resolve() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serializable document");
        let schemas = &doc["components"]["schemas"];
        // Every response body referenced by a path must be registered.
        for name in [
            "BalancesResponse",
            "BalanceEntry",
            "StellarBalancesResponse",
            "CreateWalletResponse",
            "WalletMaterialResponse",
            "ChainsResponse",
        ] {
            assert!(schemas.get(name).is_some(), "missing schema: {name}");
        }
    }
}
