//! Bank account API endpoints.

use api_types::account::{AccountCreated, AccountListQuery, AccountNew, AccountUpdate};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{Account, AccountDraft, AccountKind, Currency};

use crate::{ServerError, server::ServerState, user};

fn draft_from_parts(
    name: String,
    bank_name: Option<String>,
    account_type: Option<&str>,
    number_last4: Option<String>,
    currency: Option<&str>,
    color: Option<String>,
    notes: Option<String>,
) -> AccountDraft {
    AccountDraft {
        name,
        bank_name,
        // Unknown tags coerce to the defaults rather than failing the form.
        kind: AccountKind::parse_or_default(account_type.unwrap_or_default()),
        number_last4,
        currency: Currency::parse_or_default(currency.unwrap_or_default()),
        color,
        notes,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<AccountListQuery>,
) -> Result<Json<Vec<Account>>, ServerError> {
    let only_active = query.active.unwrap_or(false);
    let accounts = state
        .engine
        .list_accounts(&user.username, only_active)
        .await?;
    Ok(Json(accounts))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let draft = draft_from_parts(
        payload.name,
        payload.bank_name,
        payload.account_type.as_deref(),
        payload.account_number_last4,
        payload.currency.as_deref(),
        payload.color,
        payload.notes,
    );
    let id = state.engine.create_account(&user.username, draft).await?;

    Ok((StatusCode::CREATED, Json(AccountCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<StatusCode, ServerError> {
    let draft = draft_from_parts(
        payload.name,
        payload.bank_name,
        payload.account_type.as_deref(),
        payload.account_number_last4,
        payload.currency.as_deref(),
        payload.color,
        payload.notes,
    );
    state
        .engine
        .update_account(&user.username, account_id, draft, payload.is_active)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(&user.username, account_id).await?;
    Ok(StatusCode::OK)
}
