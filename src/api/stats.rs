//! Dashboard statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::stats::DashboardStats, AppState};

use super::{ApiResponse, AuthenticatedUser};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Narrow the figures to one department (admins only)
    pub department_id: Option<String>,
}

/// Statistics for the caller's department scope
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(StatsQuery),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Department not accessible")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state
        .services
        .stats
        .scoped(&claims, query.department_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(stats))
}

/// Cross-department totals, available to every signed-in user
#[utoipa::path(
    get,
    path = "/stats/overview",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "University-wide statistics", body = DashboardStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_overview(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.services.stats.overview().await?;
    Ok(ApiResponse::ok(stats))
}
