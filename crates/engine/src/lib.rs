//! Core of the balance tracker: the data model, owner-scoped store
//! operations, and the derived-metrics calculator.
//!
//! The engine splits in two halves:
//!
//! - [`Engine`] wraps the database and exposes the store operations (account
//!   CRUD, balance/income upserts, the ordered wipe, and the reads).
//! - [`metrics`]-derived types ([`DashboardMetrics`], [`MonthSummary`]) come
//!   from pure functions with no hidden state; every read recomputes them
//!   from the full current row set.
//!
//! Monetary values are integer cents ([`MoneyCents`]) everywhere; months are
//! [`MonthKey`]s normalized to the first day of the month.

pub use accounts::{Account, AccountDraft, AccountKind, Currency};
pub use balances::{BalanceDraft, MonthlyBalance};
pub use error::EngineError;
pub use incomes::{IncomeDraft, MonthlyIncome};
pub use metrics::{
    BalanceRecord, DashboardMetrics, IncomeRecord, MonthSummary, Order, Trend, WindowAverages,
    WindowTrends,
};
pub use money::MoneyCents;
pub use month::MonthKey;
pub use ops::{Engine, EngineBuilder, SeriesPoint, WipeSummary};
pub use report::{BalanceSheetRow, ExportReport, IncomeSheetRow, SummaryRow, UNSPECIFIED_ACCOUNT};
pub use users::normalize_username;

mod accounts;
mod balances;
mod error;
mod incomes;
pub mod metrics;
mod money;
mod month;
mod ops;
mod report;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
