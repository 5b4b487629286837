//! Whole-account data removal.

use sea_orm::{QueryFilter, prelude::*};
use serde::Serialize;

use crate::{ResultEngine, accounts, balances, incomes};

use super::Engine;

/// Row counts removed by [`Engine::delete_all_user_data`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WipeSummary {
    pub balances_deleted: u64,
    pub incomes_deleted: u64,
    pub accounts_deleted: u64,
}

impl Engine {
    /// Permanently deletes every row the user owns: balances first (they
    /// reference accounts), then incomes, then accounts.
    ///
    /// If a step fails the remaining steps do not run, and rows already
    /// deleted stay deleted. The operation is irreversible; callers must
    /// obtain explicit confirmation before invoking it.
    pub async fn delete_all_user_data(&self, user_id: &str) -> ResultEngine<WipeSummary> {
        let balances_deleted = balances::Entity::delete_many()
            .filter(balances::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?
            .rows_affected;

        let incomes_deleted = incomes::Entity::delete_many()
            .filter(incomes::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?
            .rows_affected;

        let accounts_deleted = accounts::Entity::delete_many()
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?
            .rows_affected;

        Ok(WipeSummary {
            balances_deleted,
            incomes_deleted,
            accounts_deleted,
        })
    }
}
