//! Monthly income operations.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::OnConflict};
use uuid::Uuid;

use crate::{EngineError, IncomeDraft, MonthlyIncome, ResultEngine, incomes, util::parse_uuid};

use super::Engine;

impl Engine {
    /// Inserts or updates the income for (user, month) and returns the row
    /// id. Uses the native on-conflict upsert keyed on the uniqueness tuple.
    pub async fn upsert_monthly_income(
        &self,
        user_id: &str,
        draft: IncomeDraft,
    ) -> ResultEngine<Uuid> {
        let now = Utc::now();
        let model = incomes::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            month_year: ActiveValue::Set(draft.month.as_date()),
            amount_minor: ActiveValue::Set(draft.amount.cents()),
            notes: ActiveValue::Set(draft.notes.clone()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        incomes::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([incomes::Column::UserId, incomes::Column::MonthYear])
                    .update_columns([
                        incomes::Column::AmountMinor,
                        incomes::Column::Notes,
                        incomes::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.database())
            .await?;

        let model = incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .filter(incomes::Column::MonthYear.eq(draft.month.as_date()))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;

        parse_uuid(&model.id, "income")
    }

    /// Deletes an income row by id, scoped to its owner.
    pub async fn delete_monthly_income(&self, user_id: &str, income_id: Uuid) -> ResultEngine<()> {
        let result = incomes::Entity::delete_many()
            .filter(incomes::Column::Id.eq(income_id.to_string()))
            .filter(incomes::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("income not exists".to_string()));
        }
        Ok(())
    }

    /// Lists a user's incomes month-descending.
    pub async fn list_incomes(&self, user_id: &str) -> ResultEngine<Vec<MonthlyIncome>> {
        incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .order_by_desc(incomes::Column::MonthYear)
            .all(self.database())
            .await?
            .into_iter()
            .map(MonthlyIncome::try_from)
            .collect()
    }
}
