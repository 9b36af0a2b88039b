// src/routes/health.rs
//
// Liveness only: reports which store the dashboard reads from without
// opening a connection to it.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{db::CommissionSource, AppState};

#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: String,
    pub auth: &'static str,
}

/// GET /health
pub async fn health<S: CommissionSource>(State(state): State<AppState<S>>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        database: state.settings.database_name.clone(),
        auth: state.settings.describe_auth(),
    })
}
