//! Whole-account data removal endpoint.

use axum::{Extension, Json, extract::State, http::HeaderMap};

use engine::WipeSummary;

use crate::{ServerError, server::ServerState, user};

const CONFIRM_HEADER: &str = "x-confirm-wipe";

/// Deletes everything the user owns, in dependency order. No backups, no
/// undo; the client must send `x-confirm-wipe: yes` to prove the user
/// confirmed.
pub async fn wipe(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<WipeSummary>, ServerError> {
    let confirmed = headers
        .get(CONFIRM_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "yes");
    if !confirmed {
        return Err(ServerError::Generic(format!(
            "confirmation required: send `{CONFIRM_HEADER}: yes`"
        )));
    }

    let summary = state.engine.delete_all_user_data(&user.username).await?;
    Ok(Json(summary))
}
