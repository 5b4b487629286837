//! Bank accounts: the `bank_accounts` entity and its domain types.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Account category tag.
///
/// The set is closed; unknown form input is coerced to [`Transactions`]
/// instead of rejected, matching the account form's behavior.
///
/// [`Transactions`]: AccountKind::Transactions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Transactions,
    Expenses,
    Savings,
    Emergency,
    Fun,
}

impl AccountKind {
    /// Canonical tag string used by the database and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccountKind::Transactions => "transactions",
            AccountKind::Expenses => "expenses",
            AccountKind::Savings => "savings",
            AccountKind::Emergency => "emergency",
            AccountKind::Fun => "fun",
        }
    }

    /// Coerces arbitrary input to a member of the closed set.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        Self::try_from(raw).unwrap_or_default()
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "transactions" => Ok(AccountKind::Transactions),
            "expenses" => Ok(AccountKind::Expenses),
            "savings" => Ok(AccountKind::Savings),
            "emergency" => Ok(AccountKind::Emergency),
            "fun" => Ok(AccountKind::Fun),
            other => Err(EngineError::InvalidAmount(format!(
                "unknown account type: {other}"
            ))),
        }
    }
}

/// Currency code carried by an account.
///
/// Stored as display metadata only; the calculator never converts between
/// currencies. Unknown input coerces to the default (`AUD`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Aud,
    Usd,
    Eur,
    Gbp,
    Nzd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Nzd => "NZD",
        }
    }

    /// Coerces arbitrary input to a member of the closed set.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        Self::try_from(raw).unwrap_or_default()
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUD" => Ok(Currency::Aud),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "NZD" => Ok(Currency::Nzd),
            other => Err(EngineError::InvalidAmount(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// A bank account as the rest of the engine sees it.
#[derive(Clone, Debug, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub bank_name: Option<String>,
    pub kind: AccountKind,
    pub number_last4: Option<String>,
    pub currency: Currency,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
}

/// Fields accepted when creating or updating an account.
///
/// Enum fields are already coerced; the engine only checks the name.
#[derive(Clone, Debug, Default)]
pub struct AccountDraft {
    pub name: String,
    pub bank_name: Option<String>,
    pub kind: AccountKind,
    pub number_last4: Option<String>,
    pub currency: Currency,
    pub color: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub bank_name: Option<String>,
    pub account_type: String,
    pub account_number_last4: Option<String>,
    pub currency: String,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::balances::Entity")]
    MonthlyBalances,
}

impl Related<super::balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Account {
            id: parse_uuid(&model.id, "account")?,
            name: model.name,
            bank_name: model.bank_name,
            // Stored values predate stricter inputs; fall back to defaults.
            kind: AccountKind::parse_or_default(&model.account_type),
            number_last4: model.account_number_last4,
            currency: Currency::parse_or_default(&model.currency),
            color: model.color,
            notes: model.notes,
            active: model.is_active,
        })
    }
}

impl From<(&Uuid, &str, &AccountDraft, bool)> for ActiveModel {
    fn from((id, user_id, draft, active): (&Uuid, &str, &AccountDraft, bool)) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            name: ActiveValue::Set(draft.name.clone()),
            bank_name: ActiveValue::Set(draft.bank_name.clone()),
            account_type: ActiveValue::Set(draft.kind.as_str().to_string()),
            account_number_last4: ActiveValue::Set(draft.number_last4.clone()),
            currency: ActiveValue::Set(draft.currency.code().to_string()),
            color: ActiveValue::Set(draft.color.clone()),
            notes: ActiveValue::Set(draft.notes.clone()),
            is_active: ActiveValue::Set(active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_account_type_coerces_to_transactions() {
        assert_eq!(
            AccountKind::parse_or_default("crypto"),
            AccountKind::Transactions
        );
        assert_eq!(AccountKind::parse_or_default("savings"), AccountKind::Savings);
    }

    #[test]
    fn unknown_currency_coerces_to_aud() {
        assert_eq!(Currency::parse_or_default("JPY"), Currency::Aud);
        assert_eq!(Currency::parse_or_default("nzd"), Currency::Nzd);
    }
}
