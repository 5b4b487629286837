use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod accounts;
mod balances;
mod data;
mod export;
mod incomes;
mod metrics;
mod server;
mod user;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountCreated, AccountNew, AccountUpdate};
        pub use engine::Account;
    }

    pub mod balance {
        pub use api_types::balance::{AccountRef, BalanceSaved, BalanceUpsert, BalanceView};
    }

    pub mod income {
        pub use api_types::income::{IncomeSaved, IncomeUpsert, IncomeView};
    }

    pub mod metrics {
        pub use engine::{DashboardMetrics, MonthSummary, SeriesPoint, Trend};
    }

    pub mod export {
        pub use api_types::export::{ExportQuery, Sheet};
    }

    pub mod data {
        pub use engine::WipeSummary;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidAmount(_) | EngineError::InvalidDate(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::InvalidId(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            let message = db_err.to_string();
            tracing::error!("database error: {message}");
            // A missing table/column usually means migrations were skipped;
            // say so instead of a blank 500.
            if message.contains("no such table") || message.contains("no such column") {
                format!("{message}. The schema looks out of date; run `cargo run -p migration -- up`.")
            } else {
                "internal server error".to_string()
            }
        }
        EngineError::InvalidId(message) => {
            tracing::error!("corrupt row: {message}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidDate("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn corrupt_rows_map_to_500() {
        let res = ServerError::from(EngineError::InvalidId("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_schema_gets_a_migration_hint() {
        let err = EngineError::Database(sea_orm::DbErr::Custom(
            "no such table: monthly_balances".to_string(),
        ));
        let message = message_for_engine_error(err);
        assert!(message.contains("run `cargo run -p migration -- up`"));
    }
}
