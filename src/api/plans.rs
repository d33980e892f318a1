//! Subscription plan listing

use axum::{extract::State, Json};

use crate::{
    models::{plans, Plan},
    AppState,
};

/// GET /api/v1/plans
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<Plan>> {
    Json(plans(state.config.quota.free_max_scans))
}
