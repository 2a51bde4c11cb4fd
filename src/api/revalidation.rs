//! Stale dashboard path endpoints

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{error::AppResult, services::revalidation::StaleEvent, AppState};

use super::{ApiResponse, AuthenticatedUser};

/// When each dashboard path last went stale
#[utoipa::path(
    get,
    path = "/revalidations",
    tag = "revalidation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stale paths", body = Vec<StaleEvent>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_stale(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<StaleEvent>>>> {
    let snapshot = state.services.revalidation.snapshot().await;
    Ok(ApiResponse::ok(snapshot))
}

/// Server-sent `stale` events, one per path marked after a mutation
#[utoipa::path(
    get,
    path = "/revalidations/stream",
    tag = "revalidation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "text/event-stream of StaleEvent", content_type = "text/event-stream"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn stream_stale(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::debug!(user_id = %claims.user_id, "Revalidation stream opened");

    // lagged receivers skip the missed events
    let stream = BroadcastStream::new(state.services.revalidation.subscribe())
        .filter_map(|event| event.ok())
        .map(|event| Event::default().event("stale").json_data(event));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
