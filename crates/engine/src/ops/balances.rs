//! Monthly balance operations.
//!
//! The upsert is a single `INSERT ... ON CONFLICT ... DO UPDATE` statement so
//! the (user, month, account) uniqueness holds without a read-then-write
//! race. SQLite needs the conflict target spelled against the matching
//! partial unique index, and the index differs for rows with and without an
//! account, hence the two statement variants.

use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Statement, prelude::*};
use uuid::Uuid;

use crate::{
    Account, BalanceDraft, EngineError, MonthlyBalance, ResultEngine, accounts, balances,
    util::parse_uuid,
};

use super::Engine;

const UPSERT_WITH_ACCOUNT: &str = "\
INSERT INTO monthly_balances \
(id, user_id, bank_account_id, month_year, balance_minor, interest_minor, one_off_minor, notes, created_at, updated_at) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
ON CONFLICT (user_id, month_year, bank_account_id) WHERE bank_account_id IS NOT NULL \
DO UPDATE SET \
balance_minor = excluded.balance_minor, \
interest_minor = excluded.interest_minor, \
one_off_minor = excluded.one_off_minor, \
notes = excluded.notes, \
updated_at = excluded.updated_at";

const UPSERT_WITHOUT_ACCOUNT: &str = "\
INSERT INTO monthly_balances \
(id, user_id, bank_account_id, month_year, balance_minor, interest_minor, one_off_minor, notes, created_at, updated_at) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
ON CONFLICT (user_id, month_year) WHERE bank_account_id IS NULL \
DO UPDATE SET \
balance_minor = excluded.balance_minor, \
interest_minor = excluded.interest_minor, \
one_off_minor = excluded.one_off_minor, \
notes = excluded.notes, \
updated_at = excluded.updated_at";

impl Engine {
    /// Inserts or updates the balance for (user, month, account-or-none) and
    /// returns the row id.
    pub async fn upsert_monthly_balance(
        &self,
        user_id: &str,
        draft: BalanceDraft,
    ) -> ResultEngine<Uuid> {
        if let Some(account_id) = draft.account_id {
            accounts::Entity::find_by_id(account_id.to_string())
                .filter(accounts::Column::UserId.eq(user_id))
                .one(self.database())
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("invalid bank account selected".to_string())
                })?;
        }

        let now = Utc::now();
        let sql = if draft.account_id.is_some() {
            UPSERT_WITH_ACCOUNT
        } else {
            UPSERT_WITHOUT_ACCOUNT
        };
        let stmt = Statement::from_sql_and_values(
            self.database().get_database_backend(),
            sql,
            vec![
                Uuid::new_v4().to_string().into(),
                user_id.into(),
                draft.account_id.map(|id| id.to_string()).into(),
                draft.month.as_date().into(),
                draft.balance.cents().into(),
                draft.interest.cents().into(),
                draft.one_off.cents().into(),
                draft.notes.clone().into(),
                now.into(),
                now.into(),
            ],
        );
        self.database().execute(stmt).await?;

        let mut query = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .filter(balances::Column::MonthYear.eq(draft.month.as_date()));
        query = match draft.account_id {
            Some(account_id) => {
                query.filter(balances::Column::BankAccountId.eq(account_id.to_string()))
            }
            None => query.filter(balances::Column::BankAccountId.is_null()),
        };
        let model = query
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("balance not exists".to_string()))?;

        parse_uuid(&model.id, "balance")
    }

    /// Deletes a balance row by id, scoped to its owner.
    pub async fn delete_monthly_balance(
        &self,
        user_id: &str,
        balance_id: Uuid,
    ) -> ResultEngine<()> {
        let result = balances::Entity::delete_many()
            .filter(balances::Column::Id.eq(balance_id.to_string()))
            .filter(balances::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("balance not exists".to_string()));
        }
        Ok(())
    }

    /// Lists a user's balances month-descending, each with its account
    /// metadata when one is linked.
    pub async fn list_balances(
        &self,
        user_id: &str,
    ) -> ResultEngine<Vec<(MonthlyBalance, Option<Account>)>> {
        let rows = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .order_by_desc(balances::Column::MonthYear)
            .find_also_related(accounts::Entity)
            .all(self.database())
            .await?;

        rows.into_iter()
            .map(|(balance_model, account_model)| {
                let balance = MonthlyBalance::try_from(balance_model)?;
                let account = account_model.map(Account::try_from).transpose()?;
                Ok((balance, account))
            })
            .collect()
    }
}
