//! Dashboard metrics endpoint.

use axum::{Extension, Json, extract::State};

use engine::DashboardMetrics;

use crate::{ServerError, server::ServerState, user};

/// Recomputes the full metrics from the user's current rows on every call.
pub async fn get_metrics(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardMetrics>, ServerError> {
    let metrics = state.engine.dashboard(&user.username).await?;
    Ok(Json(metrics))
}
