//! Derived financial metrics.
//!
//! This is where the business rules live: aggregating balance snapshots into
//! a month-keyed series and turning that series (plus incomes and per-month
//! interest/one-off totals) into the savings/spend narrative shown on the
//! dashboard.
//!
//! Everything in this module is a pure function of its inputs. The engine
//! re-runs the whole computation on every read; with at most a few hundred
//! rows per user there is nothing to cache.
//!
//! ## The savings formula
//!
//! `savings(m) = total(m) − total(prev) − one_off(m) − interest(m)`
//!
//! A raw balance change is inflated by windfalls and passive interest;
//! subtracting both isolates the savings attributable to ordinary income
//! discipline ("frugal savings"). `spend(m) = income(m) − savings(m)` is then
//! whatever regular income was not saved.
//!
//! The oldest month in the combined balance/income history is the *opening
//! month*: it has no predecessor, so savings and spend are `None` for it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::MonthKey;

/// The balance fields the calculator needs, detached from storage.
#[derive(Clone, Debug)]
pub struct BalanceRecord {
    pub month: MonthKey,
    pub account_id: Option<Uuid>,
    pub balance_minor: i64,
    pub interest_minor: i64,
    pub one_off_minor: i64,
}

/// The income fields the calculator needs.
#[derive(Clone, Debug)]
pub struct IncomeRecord {
    pub month: MonthKey,
    pub amount_minor: i64,
}

/// Sort order for [`sorted_months`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Sums balances per month, optionally restricted to a set of accounts.
///
/// A non-empty filter keeps only rows whose account id is in the set; rows
/// without an account never match a non-empty filter. Months with no
/// contributing rows are absent from the result, not present as zero.
#[must_use]
pub fn totals_by_month(
    rows: &[BalanceRecord],
    account_filter: Option<&HashSet<Uuid>>,
) -> HashMap<MonthKey, i64> {
    let mut totals = HashMap::new();

    for row in rows {
        if let Some(filter) = account_filter
            && !filter.is_empty()
            && !row.account_id.is_some_and(|id| filter.contains(&id))
        {
            continue;
        }
        *totals.entry(row.month).or_insert(0) += row.balance_minor;
    }

    totals
}

/// Month keys of a totals mapping, sorted by calendar date.
#[must_use]
pub fn sorted_months(totals: &HashMap<MonthKey, i64>, order: Order) -> Vec<MonthKey> {
    let mut months: Vec<MonthKey> = totals.keys().copied().collect();
    months.sort();
    if order == Order::Descending {
        months.reverse();
    }
    months
}

/// Per-month interest totals. Always summed across all accounts, regardless
/// of any account filter applied to the balance series.
fn interest_by_month(rows: &[BalanceRecord]) -> HashMap<MonthKey, i64> {
    let mut totals = HashMap::new();
    for row in rows {
        *totals.entry(row.month).or_insert(0) += row.interest_minor;
    }
    totals
}

/// Per-month one-off deposit totals, across all accounts.
fn one_off_by_month(rows: &[BalanceRecord]) -> HashMap<MonthKey, i64> {
    let mut totals = HashMap::new();
    for row in rows {
        *totals.entry(row.month).or_insert(0) += row.one_off_minor;
    }
    totals
}

/// One summary row per month of the combined balance/income history.
#[derive(Clone, Debug, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    /// Total balance across accounts; 0 when the month only has income data.
    pub balance_minor: i64,
    pub income_minor: i64,
    /// `None` for the opening month.
    pub savings_minor: Option<i64>,
    /// `None` wherever savings is undefined.
    pub spend_minor: Option<i64>,
    /// Spend as a share of income; `None` unless income is positive.
    pub spend_percent: Option<f64>,
    /// Savings as a share of income; `None` unless income is positive.
    pub save_percent: Option<f64>,
    pub opening_month: bool,
}

/// Builds the per-month summary, most recent month first.
#[must_use]
pub fn monthly_summary(balances: &[BalanceRecord], incomes: &[IncomeRecord]) -> Vec<MonthSummary> {
    let totals = totals_by_month(balances, None);
    let interest = interest_by_month(balances);
    let one_off = one_off_by_month(balances);

    let income_by_month: HashMap<MonthKey, i64> = incomes
        .iter()
        .map(|income| (income.month, income.amount_minor))
        .collect();

    let mut months: Vec<MonthKey> = totals
        .keys()
        .chain(income_by_month.keys())
        .copied()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    months.sort();
    months.reverse();

    months
        .iter()
        .enumerate()
        .map(|(index, &month)| {
            let balance = totals.get(&month).copied().unwrap_or(0);
            let income = income_by_month.get(&month).copied().unwrap_or(0);
            // The predecessor is the next-older month in the combined set.
            let predecessor = months.get(index + 1);
            let savings = predecessor.map(|prev| {
                let prev_total = totals.get(prev).copied().unwrap_or(0);
                balance
                    - prev_total
                    - one_off.get(&month).copied().unwrap_or(0)
                    - interest.get(&month).copied().unwrap_or(0)
            });
            let spend = savings.map(|s| income - s);
            let spend_percent = spend.and_then(|s| percent_of_income(s, income));
            let save_percent = savings.and_then(|s| percent_of_income(s, income));

            MonthSummary {
                month,
                balance_minor: balance,
                income_minor: income,
                savings_minor: savings,
                spend_minor: spend,
                spend_percent,
                save_percent,
                opening_month: predecessor.is_none(),
            }
        })
        .collect()
}

/// Average of the `window` most recent values, most recent first.
///
/// Early in a user's history fewer than `window` values exist; the average is
/// then taken over however many there are. No zero padding, no waiting for a
/// full window. `None` only when no values exist at all.
#[must_use]
pub fn rolling_average(values_desc: &[i64], window: usize) -> Option<f64> {
    if values_desc.is_empty() {
        return None;
    }
    let take = window.min(values_desc.len());
    let sum: i64 = values_desc[..take].iter().sum();
    Some(sum as f64 / take as f64)
}

/// Direction of a metric over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Compares the mean of the `window` most recent values against the mean of
/// the `window` values before them. Needs `2 × window` values; otherwise
/// there is no signal and the result is `None`.
#[must_use]
pub fn trend(values_desc: &[i64], window: usize) -> Option<Trend> {
    if window == 0 || values_desc.len() < 2 * window {
        return None;
    }
    // Both windows hold exactly `window` values, so comparing sums compares
    // means without any float involvement.
    let recent: i64 = values_desc[..window].iter().sum();
    let prior: i64 = values_desc[window..2 * window].iter().sum();
    Some(if recent > prior {
        Trend::Up
    } else if recent < prior {
        Trend::Down
    } else {
        Trend::Flat
    })
}

/// `value / income × 100`, defined only for strictly positive income.
#[must_use]
pub fn percent_of_income(value_minor: i64, income_minor: i64) -> Option<f64> {
    if income_minor > 0 {
        Some(value_minor as f64 / income_minor as f64 * 100.0)
    } else {
        None
    }
}

/// Projected savings over a year.
///
/// Uses the 12-month rolling average when 12 defined months exist; otherwise
/// averages one savings delta per consecutive month pair across the entire
/// history. 0 when no month has a defined savings value.
#[must_use]
pub fn annual_projection(summary_desc: &[MonthSummary]) -> f64 {
    let defined: Vec<i64> = summary_desc
        .iter()
        .filter_map(|row| row.savings_minor)
        .collect();

    if defined.len() >= 12 {
        let sum: i64 = defined[..12].iter().sum();
        sum as f64 / 12.0 * 12.0
    } else if defined.is_empty() {
        0.0
    } else {
        let sum: i64 = defined.iter().sum();
        sum as f64 / defined.len() as f64 * 12.0
    }
}

/// Rolling averages for the 3/6/12-month windows.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WindowAverages {
    pub three_month: Option<f64>,
    pub six_month: Option<f64>,
    pub twelve_month: Option<f64>,
}

/// Trend indicators for the 3/6/12-month windows.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WindowTrends {
    pub three_month: Option<Trend>,
    pub six_month: Option<Trend>,
    pub twelve_month: Option<Trend>,
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardMetrics {
    /// Combined history, most recent month first.
    pub months: Vec<MonthSummary>,
    /// Total balance of the most recent balance month (0 with no data).
    pub current_total_minor: i64,
    pub previous_total_minor: Option<i64>,
    pub balance_change_minor: i64,
    /// Change as a share of the previous total; `None` when there is no
    /// previous month or its total is 0.
    pub balance_change_percent: Option<f64>,
    /// Highest monthly total on record.
    pub highest_total_minor: i64,
    pub avg_spend: WindowAverages,
    pub avg_save: WindowAverages,
    pub spend_trend: WindowTrends,
    pub save_trend: WindowTrends,
    pub annual_projection_minor: f64,
}

/// Runs the full calculator over one user's rows.
#[must_use]
pub fn dashboard_metrics(
    balances: &[BalanceRecord],
    incomes: &[IncomeRecord],
) -> DashboardMetrics {
    let months = monthly_summary(balances, incomes);

    // Headline balance figures come from the balance series alone; an
    // income-only month carries no total worth headlining.
    let totals = totals_by_month(balances, None);
    let balance_months = sorted_months(&totals, Order::Descending);
    let current_total = balance_months
        .first()
        .and_then(|m| totals.get(m))
        .copied()
        .unwrap_or(0);
    let previous_total = balance_months.get(1).and_then(|m| totals.get(m)).copied();
    let balance_change = previous_total.map_or(0, |prev| current_total - prev);
    let balance_change_percent = previous_total
        .filter(|&prev| prev != 0)
        .map(|prev| balance_change as f64 / prev as f64 * 100.0);
    let highest_total = totals.values().copied().max().unwrap_or(0);

    let spend: Vec<i64> = months.iter().filter_map(|row| row.spend_minor).collect();
    let save: Vec<i64> = months.iter().filter_map(|row| row.savings_minor).collect();

    let averages = |values: &[i64]| WindowAverages {
        three_month: rolling_average(values, 3),
        six_month: rolling_average(values, 6),
        twelve_month: rolling_average(values, 12),
    };
    let trends = |values: &[i64]| WindowTrends {
        three_month: trend(values, 3),
        six_month: trend(values, 6),
        twelve_month: trend(values, 12),
    };

    let annual_projection_minor = annual_projection(&months);

    DashboardMetrics {
        current_total_minor: current_total,
        previous_total_minor: previous_total,
        balance_change_minor: balance_change,
        balance_change_percent,
        highest_total_minor: highest_total,
        avg_spend: averages(&spend),
        avg_save: averages(&save),
        spend_trend: trends(&spend),
        save_trend: trends(&save),
        annual_projection_minor,
        months,
    }
}
