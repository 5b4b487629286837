//! Read operations feeding the calculator and the export.
//!
//! Each read loads the user's full current row set and recomputes from
//! scratch; the datasets are small enough that incremental computation would
//! only add invalidation problems.

use std::collections::HashSet;

use sea_orm::{QueryFilter, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    DashboardMetrics, ExportReport, MonthKey, ResultEngine, balances, incomes,
    metrics::{self, BalanceRecord, IncomeRecord, Order},
    report,
};

use super::Engine;

/// One point of the total-balance-by-month series.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SeriesPoint {
    pub month: MonthKey,
    pub total_minor: i64,
}

impl Engine {
    /// Computes the full dashboard metrics from the user's current rows.
    pub async fn dashboard(&self, user_id: &str) -> ResultEngine<DashboardMetrics> {
        let balances = self.balance_records(user_id).await?;
        let incomes = self.income_records(user_id).await?;
        Ok(metrics::dashboard_metrics(&balances, &incomes))
    }

    /// Total balance per month, ascending, optionally restricted to a set of
    /// accounts (an empty slice means all accounts).
    pub async fn balance_series(
        &self,
        user_id: &str,
        accounts: &[Uuid],
    ) -> ResultEngine<Vec<SeriesPoint>> {
        let records = self.balance_records(user_id).await?;
        let filter: HashSet<Uuid> = accounts.iter().copied().collect();

        let totals = metrics::totals_by_month(&records, Some(&filter));
        let months = metrics::sorted_months(&totals, Order::Ascending);

        Ok(months
            .into_iter()
            .map(|month| SeriesPoint {
                month,
                total_minor: totals.get(&month).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Builds the three-sheet export report.
    pub async fn export_report(&self, user_id: &str) -> ResultEngine<ExportReport> {
        let balances = self.list_balances(user_id).await?;
        let incomes = self.list_incomes(user_id).await?;
        Ok(report::export_report(&balances, &incomes))
    }

    async fn balance_records(&self, user_id: &str) -> ResultEngine<Vec<BalanceRecord>> {
        let models = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .all(self.database())
            .await?;

        models
            .into_iter()
            .map(|model| {
                let account_id = match model.bank_account_id.as_deref() {
                    Some(raw) => Some(crate::util::parse_uuid(raw, "account")?),
                    None => None,
                };
                Ok(BalanceRecord {
                    month: MonthKey::from_date(model.month_year),
                    account_id,
                    balance_minor: model.balance_minor,
                    interest_minor: model.interest_minor,
                    one_off_minor: model.one_off_minor,
                })
            })
            .collect()
    }

    async fn income_records(&self, user_id: &str) -> ResultEngine<Vec<IncomeRecord>> {
        let models = incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .all(self.database())
            .await?;

        Ok(models
            .into_iter()
            .map(|model| IncomeRecord {
                month: MonthKey::from_date(model.month_year),
                amount_minor: model.amount_minor,
            })
            .collect())
    }
}
