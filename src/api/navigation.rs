//! View routing endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{middleware::AuthUser, models::Navigation, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct NavigationQuery {
    pub view: Option<String>,
}

/// GET /api/v1/navigation?view=
///
/// Resolves the requested view against a freshly loaded profile.
pub async fn get_navigation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<NavigationQuery>,
) -> Json<Navigation> {
    let profile = state.sessions.current_profile(&auth_user).await;
    let requested = query.view.as_deref().unwrap_or("scanner");
    Json(Navigation::build(requested, &profile))
}
