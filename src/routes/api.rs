// src/routes/api.rs

use axum::{extract::State, Json};

use crate::{
    db::CommissionSource,
    models::{CommissionRecord, CommissionSummary, DataEnvelope, SummaryEnvelope},
    AppState,
};
use super::{internal_error, ApiError, FETCH_FAILED};

/// Runs the commission query over the default window.
async fn load<S: CommissionSource>(state: &AppState<S>) -> Result<Vec<CommissionRecord>, ApiError> {
    state
        .source
        .get_commission_data(state.settings.default_start_date, None)
        .await
        .ok_or_else(|| internal_error(FETCH_FAILED))
}

/// GET /api/commission-data
pub async fn commission_data<S: CommissionSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let data = load(&state).await?;
    Ok(Json(DataEnvelope::success(data)))
}

/// GET /api/commission-summary
pub async fn commission_summary<S: CommissionSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<SummaryEnvelope>, ApiError> {
    let data = load(&state).await?;
    let summary = CommissionSummary::from_records(&data);
    tracing::debug!(records = summary.total_records, "commission summary computed");
    Ok(Json(SummaryEnvelope::success(summary)))
}
