//! Monthly income: the `monthly_incomes` entity and domain types.
//!
//! At most one row per (user, month), maintained by a native
//! insert-or-update upsert.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, MonthKey, util::parse_uuid};

/// A stored income record.
#[derive(Clone, Debug, Serialize)]
pub struct MonthlyIncome {
    pub id: Uuid,
    pub month: MonthKey,
    pub amount_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by the income upsert.
#[derive(Clone, Debug)]
pub struct IncomeDraft {
    pub month: MonthKey,
    pub amount: MoneyCents,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "monthly_incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub month_year: Date,
    pub amount_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MonthlyIncome {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(MonthlyIncome {
            id: parse_uuid(&model.id, "income")?,
            month: MonthKey::from_date(model.month_year),
            amount_minor: model.amount_minor,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
