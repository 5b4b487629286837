//! Monthly income API endpoints.

use api_types::income::{IncomeSaved, IncomeUpsert, IncomeView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{IncomeDraft, MoneyCents, MonthKey, MonthlyIncome};

use crate::{ServerError, server::ServerState, user};

fn view_from_row(income: MonthlyIncome) -> IncomeView {
    IncomeView {
        id: income.id,
        month: income.month.to_string(),
        amount_minor: income.amount_minor,
        notes: income.notes,
        created_at: income.created_at,
        updated_at: income.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let rows = state.engine.list_incomes(&user.username).await?;
    Ok(Json(rows.into_iter().map(view_from_row).collect()))
}

pub async fn upsert(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeUpsert>,
) -> Result<(StatusCode, Json<IncomeSaved>), ServerError> {
    let month = MonthKey::parse(&payload.month)?;
    // A blank amount clears the month to zero income rather than erroring.
    let amount = MoneyCents::parse_non_negative(payload.amount.as_deref(), "income amount")?;

    let draft = IncomeDraft {
        month,
        amount,
        notes: payload.notes.filter(|notes| !notes.trim().is_empty()),
    };
    let id = state
        .engine
        .upsert_monthly_income(&user.username, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(IncomeSaved { id })))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(income_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_monthly_income(&user.username, income_id)
        .await?;
    Ok(StatusCode::OK)
}
