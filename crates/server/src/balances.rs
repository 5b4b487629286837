//! Monthly balance API endpoints.

use api_types::{
    balance::{AccountRef, BalanceSaved, BalanceUpsert, BalanceView},
    series::SeriesQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{Account, BalanceDraft, EngineError, MoneyCents, MonthKey, MonthlyBalance, SeriesPoint};

use crate::{ServerError, server::ServerState, user};

fn view_from_row((balance, account): (MonthlyBalance, Option<Account>)) -> BalanceView {
    BalanceView {
        id: balance.id,
        bank_account_id: balance.account_id,
        month: balance.month.to_string(),
        balance_minor: balance.balance_minor,
        interest_minor: balance.interest_minor,
        one_off_minor: balance.one_off_minor,
        notes: balance.notes,
        account: account.map(|account| AccountRef {
            name: account.name,
            bank_name: account.bank_name,
            account_type: account.kind.as_str().to_string(),
            color: account.color,
        }),
        created_at: balance.created_at,
        updated_at: balance.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BalanceView>>, ServerError> {
    let rows = state.engine.list_balances(&user.username).await?;
    Ok(Json(rows.into_iter().map(view_from_row).collect()))
}

pub async fn upsert(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BalanceUpsert>,
) -> Result<(StatusCode, Json<BalanceSaved>), ServerError> {
    if payload.balance.trim().is_empty() {
        return Err(
            EngineError::InvalidAmount("month and balance are required".to_string()).into(),
        );
    }

    let month = MonthKey::parse(&payload.month)?;
    let balance = MoneyCents::parse_non_negative(Some(&payload.balance), "balance")?;
    let interest =
        MoneyCents::parse_non_negative(payload.interest_earned.as_deref(), "interest earned")?;
    let one_off =
        MoneyCents::parse_non_negative(payload.one_off_deposit.as_deref(), "one-off deposit")?;

    let draft = BalanceDraft {
        account_id: payload.bank_account_id,
        month,
        balance,
        interest,
        one_off,
        notes: payload.notes.filter(|notes| !notes.trim().is_empty()),
    };
    let id = state
        .engine
        .upsert_monthly_balance(&user.username, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(BalanceSaved { id })))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(balance_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_monthly_balance(&user.username, balance_id)
        .await?;
    Ok(StatusCode::OK)
}

/// Total balance per month, ascending; `?accounts=a,b` restricts the series
/// to those accounts for chart filtering.
pub async fn series(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<SeriesPoint>>, ServerError> {
    let accounts = parse_account_filter(query.accounts.as_deref())?;
    let points = state.engine.balance_series(&user.username, &accounts).await?;
    Ok(Json(points))
}

fn parse_account_filter(raw: Option<&str>) -> Result<Vec<Uuid>, ServerError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part)
                .map_err(|_| ServerError::Generic(format!("invalid account id: {part}")))
        })
        .collect()
}
