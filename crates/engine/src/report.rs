//! Export report: the three tables behind the downloadable spreadsheet.
//!
//! Pure formatting over rows the store already loaded and the calculator
//! already summarized; the server renders each table as CSV.

use serde::Serialize;

use crate::{
    Account, MonthlyBalance, MonthlyIncome,
    metrics::{self, BalanceRecord, IncomeRecord},
};

/// Account label used for rows recorded without a specific account.
pub const UNSPECIFIED_ACCOUNT: &str = "All / Unspecified";

/// One row of the summary-by-month sheet.
#[derive(Clone, Debug, Serialize)]
pub struct SummaryRow {
    pub month: String,
    pub balance_minor: i64,
    pub income_minor: i64,
    pub spend_minor: Option<i64>,
    pub save_minor: Option<i64>,
    pub save_percent: Option<f64>,
}

/// One row of the balances-by-account sheet.
#[derive(Clone, Debug, Serialize)]
pub struct BalanceSheetRow {
    pub month: String,
    pub account: String,
    pub balance_minor: i64,
    pub interest_minor: i64,
    pub one_off_minor: i64,
    pub notes: String,
}

/// One row of the income sheet.
#[derive(Clone, Debug, Serialize)]
pub struct IncomeSheetRow {
    pub month: String,
    pub amount_minor: i64,
    pub notes: String,
}

/// The full export: summary-by-month, balances-by-account, income-by-month.
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub summary: Vec<SummaryRow>,
    pub balances: Vec<BalanceSheetRow>,
    pub incomes: Vec<IncomeSheetRow>,
}

/// Builds the report from one user's rows, all sheets most recent first.
#[must_use]
pub fn export_report(
    balances: &[(MonthlyBalance, Option<Account>)],
    incomes: &[MonthlyIncome],
) -> ExportReport {
    let balance_records: Vec<BalanceRecord> = balances
        .iter()
        .map(|(row, _)| BalanceRecord {
            month: row.month,
            account_id: row.account_id,
            balance_minor: row.balance_minor,
            interest_minor: row.interest_minor,
            one_off_minor: row.one_off_minor,
        })
        .collect();
    let income_records: Vec<IncomeRecord> = incomes
        .iter()
        .map(|row| IncomeRecord {
            month: row.month,
            amount_minor: row.amount_minor,
        })
        .collect();

    let summary = metrics::monthly_summary(&balance_records, &income_records)
        .into_iter()
        .map(|row| SummaryRow {
            month: row.month.label(),
            balance_minor: row.balance_minor,
            income_minor: row.income_minor,
            spend_minor: row.spend_minor,
            save_minor: row.savings_minor,
            save_percent: row.save_percent,
        })
        .collect();

    let mut balance_rows: Vec<(&MonthlyBalance, &Option<Account>)> =
        balances.iter().map(|(row, account)| (row, account)).collect();
    balance_rows.sort_by(|a, b| b.0.month.cmp(&a.0.month));
    let balances = balance_rows
        .into_iter()
        .map(|(row, account)| BalanceSheetRow {
            month: row.month.label(),
            account: account
                .as_ref()
                .map_or_else(|| UNSPECIFIED_ACCOUNT.to_string(), |a| a.name.clone()),
            balance_minor: row.balance_minor,
            interest_minor: row.interest_minor,
            one_off_minor: row.one_off_minor,
            notes: row.notes.clone().unwrap_or_default(),
        })
        .collect();

    let mut income_rows: Vec<&MonthlyIncome> = incomes.iter().collect();
    income_rows.sort_by(|a, b| b.month.cmp(&a.month));
    let incomes = income_rows
        .into_iter()
        .map(|row| IncomeSheetRow {
            month: row.month.label(),
            amount_minor: row.amount_minor,
            notes: row.notes.clone().unwrap_or_default(),
        })
        .collect();

    ExportReport {
        summary,
        balances,
        incomes,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::MonthKey;

    fn stored_balance(month: &str, amount: i64) -> MonthlyBalance {
        MonthlyBalance {
            id: Uuid::new_v4(),
            account_id: None,
            month: MonthKey::parse(month).unwrap(),
            balance_minor: amount,
            interest_minor: 0,
            one_off_minor: 0,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unattributed_rows_get_the_shared_label() {
        let report = export_report(&[(stored_balance("2025-02", 1000), None)], &[]);
        assert_eq!(report.balances.len(), 1);
        assert_eq!(report.balances[0].account, UNSPECIFIED_ACCOUNT);
        assert_eq!(report.balances[0].month, "Feb 2025");
    }

    #[test]
    fn summary_rows_match_calculator_output() {
        let rows = vec![
            (stored_balance("2025-01", 1000), None),
            (stored_balance("2025-02", 1200), None),
        ];
        let report = export_report(&rows, &[]);
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.summary[0].save_minor, Some(200));
        assert_eq!(report.summary[1].save_minor, None);
    }

    #[test]
    fn sheets_are_sorted_most_recent_first() {
        let rows = vec![
            (stored_balance("2025-01", 1), None),
            (stored_balance("2025-03", 3), None),
            (stored_balance("2025-02", 2), None),
        ];
        let report = export_report(&rows, &[]);
        let months: Vec<&str> = report.balances.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["Mar 2025", "Feb 2025", "Jan 2025"]);
    }
}
