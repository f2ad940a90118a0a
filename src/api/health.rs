// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Number of configured EVM chains.
    pub chains: usize,
    /// Mail delivery mode ("http" or "log").
    pub mailer: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = ReadyResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ReadyResponse> {
    let mailer = match *state.mailer {
        crate::mailer::Mailer::Http(_) => "http",
        crate::mailer::Mailer::Log => "log",
    };

    Json(ReadyResponse {
        status: "ok".to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            chains: state.registry.list_all().len(),
            mailer: mailer.to_string(),
        },
    })
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, body = HealthResponse))
)]
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
