//! Monthly balance snapshots: the `monthly_balances` entity and domain types.
//!
//! One row per (user, month, account-or-none). A `NULL` account means the
//! user recorded an aggregate figure instead of a per-account one; callers
//! that need to distinguish "no data" from "true zero" must look at row
//! presence, not the amount.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, MonthKey, util::parse_uuid};

/// A stored balance snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct MonthlyBalance {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub month: MonthKey,
    pub balance_minor: i64,
    pub interest_minor: i64,
    pub one_off_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by the balance upsert. Amounts are already validated
/// non-negative.
#[derive(Clone, Debug)]
pub struct BalanceDraft {
    pub account_id: Option<Uuid>,
    pub month: MonthKey,
    pub balance: MoneyCents,
    pub interest: MoneyCents,
    pub one_off: MoneyCents,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "monthly_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub bank_account_id: Option<String>,
    pub month_year: Date,
    pub balance_minor: i64,
    pub interest_minor: i64,
    pub one_off_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BankAccounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MonthlyBalance {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let account_id = match model.bank_account_id.as_deref() {
            Some(raw) => Some(parse_uuid(raw, "account")?),
            None => None,
        };
        Ok(MonthlyBalance {
            id: parse_uuid(&model.id, "balance")?,
            account_id,
            month: MonthKey::from_date(model.month_year),
            balance_minor: model.balance_minor,
            interest_minor: model.interest_minor,
            one_off_minor: model.one_off_minor,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
