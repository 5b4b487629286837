//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `bank_accounts`: account metadata owned by users
//! - `monthly_balances`: one balance snapshot per (user, month, account)
//! - `monthly_incomes`: one income figure per (user, month)
//!
//! The two partial unique indexes on `monthly_balances` split the uniqueness
//! rule by whether a row is tied to an account; the engine's upsert targets
//! them with `ON CONFLICT ... WHERE ...`, which the schema builder cannot
//! express, so they are raw SQL.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    Name,
    BankName,
    AccountType,
    AccountNumberLast4,
    Currency,
    Color,
    Notes,
    IsActive,
}

#[derive(Iden)]
enum MonthlyBalances {
    Table,
    Id,
    UserId,
    BankAccountId,
    MonthYear,
    BalanceMinor,
    InterestMinor,
    OneOffMinor,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MonthlyIncomes {
    Table,
    Id,
    UserId,
    MonthYear,
    AmountMinor,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccounts::UserId).string().not_null())
                    .col(ColumnDef::new(BankAccounts::Name).string().not_null())
                    .col(ColumnDef::new(BankAccounts::BankName).string())
                    .col(ColumnDef::new(BankAccounts::AccountType).string().not_null())
                    .col(ColumnDef::new(BankAccounts::AccountNumberLast4).string())
                    .col(ColumnDef::new(BankAccounts::Currency).string().not_null())
                    .col(ColumnDef::new(BankAccounts::Color).string())
                    .col(ColumnDef::new(BankAccounts::Notes).string())
                    .col(
                        ColumnDef::new(BankAccounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_accounts-user_id")
                            .from(BankAccounts::Table, BankAccounts::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_accounts-user_id")
                    .table(BankAccounts::Table)
                    .col(BankAccounts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyBalances::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyBalances::UserId).string().not_null())
                    .col(ColumnDef::new(MonthlyBalances::BankAccountId).string())
                    .col(ColumnDef::new(MonthlyBalances::MonthYear).date().not_null())
                    .col(
                        ColumnDef::new(MonthlyBalances::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyBalances::InterestMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyBalances::OneOffMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MonthlyBalances::Notes).string())
                    .col(
                        ColumnDef::new(MonthlyBalances::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyBalances::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-monthly_balances-user_id")
                            .from(MonthlyBalances::Table, MonthlyBalances::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-monthly_balances-bank_account_id")
                            .from(MonthlyBalances::Table, MonthlyBalances::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-monthly_balances-user_id-month_year")
                    .table(MonthlyBalances::Table)
                    .col(MonthlyBalances::UserId)
                    .col(MonthlyBalances::MonthYear)
                    .to_owned(),
            )
            .await?;

        // Uniqueness of (user, month, account-or-null); conflict targets for
        // the engine's upsert.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \
                 \"uniq-monthly_balances-user-month-account\" \
                 ON \"monthly_balances\" (\"user_id\", \"month_year\", \"bank_account_id\") \
                 WHERE \"bank_account_id\" IS NOT NULL",
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \
                 \"uniq-monthly_balances-user-month-unspecified\" \
                 ON \"monthly_balances\" (\"user_id\", \"month_year\") \
                 WHERE \"bank_account_id\" IS NULL",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyIncomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyIncomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyIncomes::UserId).string().not_null())
                    .col(ColumnDef::new(MonthlyIncomes::MonthYear).date().not_null())
                    .col(
                        ColumnDef::new(MonthlyIncomes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyIncomes::Notes).string())
                    .col(
                        ColumnDef::new(MonthlyIncomes::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyIncomes::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-monthly_incomes-user_id")
                            .from(MonthlyIncomes::Table, MonthlyIncomes::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq-monthly_incomes-user_id-month_year")
                    .table(MonthlyIncomes::Table)
                    .col(MonthlyIncomes::UserId)
                    .col(MonthlyIncomes::MonthYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
