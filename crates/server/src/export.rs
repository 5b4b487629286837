//! CSV export endpoint.
//!
//! One sheet per request: `?sheet=summary|balances|income`. Amounts are
//! formatted in major units; undefined spend/save cells stay blank so a
//! spreadsheet does not mistake the opening month for a zero.

use api_types::export::{ExportQuery, Sheet};
use axum::{
    Extension,
    extract::{Query, State},
    http::header::{self, HeaderName},
};
use chrono::Utc;
use csv::Writer;

use engine::{ExportReport, MoneyCents};

use crate::{ServerError, server::ServerState, user};

pub async fn download(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> Result<([(HeaderName, String); 2], String), ServerError> {
    let report = state.engine.export_report(&user.username).await?;

    let (name, body) = match query.sheet {
        Sheet::Summary => ("summary-by-month", summary_sheet(&report)?),
        Sheet::Balances => ("balances", balances_sheet(&report)?),
        Sheet::Income => ("income", income_sheet(&report)?),
    };
    let filename = format!("saldo-{name}-{}.csv", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

fn money(minor: i64) -> String {
    MoneyCents::new(minor).to_string()
}

fn opt_money(minor: Option<i64>) -> String {
    minor.map(money).unwrap_or_default()
}

fn percent(value: Option<f64>) -> String {
    value.map(|p| format!("{p:.1}%")).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ServerError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    String::from_utf8(bytes).map_err(|err| ServerError::Generic(format!("export failed: {err}")))
}

fn summary_sheet(report: &ExportReport) -> Result<String, ServerError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(["Month", "Total balance", "Income", "Spend", "Save", "Save %"])
        .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    for row in &report.summary {
        writer
            .write_record([
                row.month.clone(),
                money(row.balance_minor),
                money(row.income_minor),
                opt_money(row.spend_minor),
                opt_money(row.save_minor),
                percent(row.save_percent),
            ])
            .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    }
    finish(writer)
}

fn balances_sheet(report: &ExportReport) -> Result<String, ServerError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Month",
            "Account",
            "Balance",
            "Interest",
            "One-off deposit",
            "Notes",
        ])
        .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    for row in &report.balances {
        writer
            .write_record([
                row.month.clone(),
                row.account.clone(),
                money(row.balance_minor),
                money(row.interest_minor),
                money(row.one_off_minor),
                row.notes.clone(),
            ])
            .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    }
    finish(writer)
}

fn income_sheet(report: &ExportReport) -> Result<String, ServerError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(["Month", "Amount", "Notes"])
        .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    for row in &report.incomes {
        writer
            .write_record([row.month.clone(), money(row.amount_minor), row.notes.clone()])
            .map_err(|err| ServerError::Generic(format!("export failed: {err}")))?;
    }
    finish(writer)
}
