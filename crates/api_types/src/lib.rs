use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account {
    use super::*;

    /// Request body for creating an account.
    ///
    /// `account_type` and `currency` are free text here; the server coerces
    /// unknown values to the defaults instead of rejecting them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub bank_name: Option<String>,
        pub account_type: Option<String>,
        pub account_number_last4: Option<String>,
        pub currency: Option<String>,
        pub color: Option<String>,
        pub notes: Option<String>,
    }

    /// Request body for updating an account. All fields are replaced.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: String,
        pub bank_name: Option<String>,
        pub account_type: Option<String>,
        pub account_number_last4: Option<String>,
        pub currency: Option<String>,
        pub color: Option<String>,
        pub notes: Option<String>,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub id: Uuid,
    }

    /// Query for the account list.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountListQuery {
        /// `true` restricts the list to active accounts.
        pub active: Option<bool>,
    }
}

pub mod balance {
    use super::*;

    /// Request body for the balance upsert.
    ///
    /// `month` is `YYYY-MM` (or a full date; the day is normalized to the
    /// 1st). Amounts are decimal strings exactly as typed into the form;
    /// blank interest/one-off count as zero. The server re-parses and
    /// validates all of them before touching the store.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceUpsert {
        pub bank_account_id: Option<Uuid>,
        pub month: String,
        pub balance: String,
        pub interest_earned: Option<String>,
        pub one_off_deposit: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceSaved {
        pub id: Uuid,
    }

    /// A stored balance row joined with its account metadata.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub id: Uuid,
        pub bank_account_id: Option<Uuid>,
        /// Month key, `YYYY-MM`.
        pub month: String,
        pub balance_minor: i64,
        pub interest_minor: i64,
        pub one_off_minor: i64,
        pub notes: Option<String>,
        pub account: Option<AccountRef>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// The slice of account metadata shown next to a balance row.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountRef {
        pub name: String,
        pub bank_name: Option<String>,
        pub account_type: String,
        pub color: Option<String>,
    }
}

pub mod income {
    use super::*;

    /// Request body for the income upsert. Same conventions as the balance
    /// upsert: `YYYY-MM` month, decimal-string amount, blank = zero.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpsert {
        pub month: String,
        pub amount: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeSaved {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        /// Month key, `YYYY-MM`.
        pub month: String,
        pub amount_minor: i64,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod series {
    use super::*;

    /// Query for the total-balance-by-month series.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SeriesQuery {
        /// Comma-separated account ids; empty or absent means all accounts.
        pub accounts: Option<String>,
    }
}

pub mod export {
    use super::*;

    /// Which export sheet to download.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Sheet {
        Summary,
        Balances,
        Income,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExportQuery {
        pub sheet: Sheet,
    }
}
