//! Bank account operations.

use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Account, AccountDraft, EngineError, ResultEngine, accounts, balances,
    util::normalize_optional_text,
};

use super::{Engine, normalize_required_name};

impl Engine {
    /// Creates a bank account and returns its id.
    pub async fn create_account(&self, user_id: &str, draft: AccountDraft) -> ResultEngine<Uuid> {
        let draft = normalize_draft(draft)?;
        let id = Uuid::new_v4();

        accounts::ActiveModel::from((&id, user_id, &draft, true))
            .insert(self.database())
            .await?;

        Ok(id)
    }

    /// Replaces an account's fields, including the active flag.
    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        draft: AccountDraft,
        active: bool,
    ) -> ResultEngine<()> {
        let draft = normalize_draft(draft)?;
        let model = accounts::ActiveModel::from((&account_id, user_id, &draft, active));

        let result = accounts::Entity::update_many()
            .set(model)
            .filter(accounts::Column::Id.eq(account_id.to_string()))
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("account not exists".to_string()));
        }
        Ok(())
    }

    /// Deletes an account and the balance history recorded against it.
    pub async fn delete_account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<()> {
        balances::Entity::delete_many()
            .filter(balances::Column::BankAccountId.eq(account_id.to_string()))
            .filter(balances::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?;

        let result = accounts::Entity::delete_many()
            .filter(accounts::Column::Id.eq(account_id.to_string()))
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(self.database())
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("account not exists".to_string()));
        }
        Ok(())
    }

    /// Lists a user's accounts, name-ascending.
    pub async fn list_accounts(&self, user_id: &str, only_active: bool) -> ResultEngine<Vec<Account>> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name);
        if only_active {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }

        query
            .all(self.database())
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}

fn normalize_draft(draft: AccountDraft) -> ResultEngine<AccountDraft> {
    Ok(AccountDraft {
        name: normalize_required_name(&draft.name, "account")?,
        bank_name: normalize_optional_text(draft.bank_name.as_deref()),
        number_last4: normalize_optional_text(draft.number_last4.as_deref()),
        color: normalize_optional_text(draft.color.as_deref()),
        notes: normalize_optional_text(draft.notes.as_deref()),
        ..draft
    })
}
