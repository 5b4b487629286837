use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    AccountDraft, AccountKind, BalanceDraft, Currency, Engine, EngineError, IncomeDraft,
    MoneyCents, MonthKey,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn month(raw: &str) -> MonthKey {
    MonthKey::parse(raw).unwrap()
}

fn balance_draft(month_raw: &str, cents: i64) -> BalanceDraft {
    BalanceDraft {
        account_id: None,
        month: month(month_raw),
        balance: MoneyCents::new(cents),
        interest: MoneyCents::ZERO,
        one_off: MoneyCents::ZERO,
        notes: None,
    }
}

fn account_draft(name: &str) -> AccountDraft {
    AccountDraft {
        name: name.to_string(),
        kind: AccountKind::Savings,
        currency: Currency::Aud,
        ..AccountDraft::default()
    }
}

#[tokio::test]
async fn upsert_balance_twice_updates_existing_row() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 1000))
        .await
        .unwrap();
    let second = engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 2500))
        .await
        .unwrap();

    assert_eq!(first, second);

    let rows = engine.list_balances("alice").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.balance_minor, 2500);
}

#[tokio::test]
async fn upsert_updates_interest_one_off_and_notes() {
    let (engine, _db) = engine_with_db().await;

    engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 1000))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                interest: MoneyCents::new(20),
                one_off: MoneyCents::new(500),
                notes: Some("bonus month".to_string()),
                ..balance_draft("2025-01", 1000)
            },
        )
        .await
        .unwrap();

    let rows = engine.list_balances("alice").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.interest_minor, 20);
    assert_eq!(rows[0].0.one_off_minor, 500);
    assert_eq!(rows[0].0.notes.as_deref(), Some("bonus month"));
}

#[tokio::test]
async fn per_account_and_unspecified_rows_are_distinct() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();

    engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 100))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                account_id: Some(account_id),
                ..balance_draft("2025-01", 200)
            },
        )
        .await
        .unwrap();

    let rows = engine.list_balances("alice").await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn upsert_rejects_other_users_account() {
    let (engine, _db) = engine_with_db().await;

    let bobs_account = engine
        .create_account("bob", account_draft("Bob's"))
        .await
        .unwrap();

    let err = engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                account_id: Some(bobs_account),
                ..balance_draft("2025-01", 100)
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("invalid bank account selected".to_string())
    );
}

#[tokio::test]
async fn deletes_are_owner_scoped() {
    let (engine, _db) = engine_with_db().await;

    let balance_id = engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 100))
        .await
        .unwrap();

    // Bob matches zero rows; Alice's row survives.
    assert!(engine.delete_monthly_balance("bob", balance_id).await.is_err());
    assert_eq!(engine.list_balances("alice").await.unwrap().len(), 1);

    engine
        .delete_monthly_balance("alice", balance_id)
        .await
        .unwrap();
    assert!(engine.list_balances("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn account_update_is_owner_scoped() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();

    let err = engine
        .update_account("bob", account_id, account_draft("Hijacked"), false)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("account not exists".to_string()));

    engine
        .update_account("alice", account_id, account_draft("Renamed"), false)
        .await
        .unwrap();

    let accounts = engine.list_accounts("alice", false).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].name, "Renamed");
    assert!(!accounts[0].active);
    assert!(engine.list_accounts("alice", true).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_account_removes_its_balance_history() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                account_id: Some(account_id),
                ..balance_draft("2025-01", 100)
            },
        )
        .await
        .unwrap();
    engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 900))
        .await
        .unwrap();

    engine.delete_account("alice", account_id).await.unwrap();

    let rows = engine.list_balances("alice").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].0.account_id.is_none());
}

#[tokio::test]
async fn income_upsert_keeps_one_row_per_month() {
    let (engine, _db) = engine_with_db().await;

    let draft = IncomeDraft {
        month: month("2025-02"),
        amount: MoneyCents::new(4000),
        notes: None,
    };
    let first = engine.upsert_monthly_income("alice", draft).await.unwrap();
    let second = engine
        .upsert_monthly_income(
            "alice",
            IncomeDraft {
                month: month("2025-02"),
                amount: MoneyCents::new(5000),
                notes: Some("raise".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(first, second);
    let incomes = engine.list_incomes("alice").await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].amount_minor, 5000);
    assert_eq!(incomes[0].notes.as_deref(), Some("raise"));
}

#[tokio::test]
async fn delete_all_user_data_reports_counts_and_spares_others() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                account_id: Some(account_id),
                ..balance_draft("2025-01", 100)
            },
        )
        .await
        .unwrap();
    engine
        .upsert_monthly_balance("alice", balance_draft("2025-02", 200))
        .await
        .unwrap();
    engine
        .upsert_monthly_income(
            "alice",
            IncomeDraft {
                month: month("2025-01"),
                amount: MoneyCents::new(100),
                notes: None,
            },
        )
        .await
        .unwrap();

    engine
        .upsert_monthly_balance("bob", balance_draft("2025-01", 999))
        .await
        .unwrap();

    let summary = engine.delete_all_user_data("alice").await.unwrap();
    assert_eq!(summary.balances_deleted, 2);
    assert_eq!(summary.incomes_deleted, 1);
    assert_eq!(summary.accounts_deleted, 1);

    assert!(engine.list_balances("alice").await.unwrap().is_empty());
    assert!(engine.list_incomes("alice").await.unwrap().is_empty());
    assert!(engine.list_accounts("alice", false).await.unwrap().is_empty());

    assert_eq!(engine.list_balances("bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_balances_carries_account_metadata() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                account_id: Some(account_id),
                ..balance_draft("2025-01", 100)
            },
        )
        .await
        .unwrap();

    let rows = engine.list_balances("alice").await.unwrap();
    let (_, account) = &rows[0];
    assert_eq!(account.as_ref().unwrap().name, "Everyday");
    assert_eq!(account.as_ref().unwrap().kind, AccountKind::Savings);
}

#[tokio::test]
async fn dashboard_over_stored_rows() {
    let (engine, _db) = engine_with_db().await;

    engine
        .upsert_monthly_balance("alice", balance_draft("2025-01", 1000))
        .await
        .unwrap();
    engine
        .upsert_monthly_balance(
            "alice",
            BalanceDraft {
                interest: MoneyCents::new(20),
                ..balance_draft("2025-02", 1200)
            },
        )
        .await
        .unwrap();
    engine
        .upsert_monthly_income(
            "alice",
            IncomeDraft {
                month: month("2025-02"),
                amount: MoneyCents::new(400),
                notes: None,
            },
        )
        .await
        .unwrap();

    let metrics = engine.dashboard("alice").await.unwrap();
    assert_eq!(metrics.months.len(), 2);
    assert_eq!(metrics.months[0].savings_minor, Some(180));
    assert_eq!(metrics.months[0].spend_minor, Some(220));
    assert_eq!(metrics.current_total_minor, 1200);
    assert_eq!(metrics.previous_total_minor, Some(1000));
}

#[tokio::test]
async fn balance_series_respects_account_filter() {
    let (engine, _db) = engine_with_db().await;

    let everyday = engine
        .create_account("alice", account_draft("Everyday"))
        .await
        .unwrap();
    let savings = engine
        .create_account("alice", account_draft("Savings"))
        .await
        .unwrap();

    for (account, cents) in [(everyday, 100), (savings, 900)] {
        engine
            .upsert_monthly_balance(
                "alice",
                BalanceDraft {
                    account_id: Some(account),
                    ..balance_draft("2025-01", cents)
                },
            )
            .await
            .unwrap();
    }

    let all = engine.balance_series("alice", &[]).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].total_minor, 1000);

    let filtered = engine.balance_series("alice", &[everyday]).await.unwrap();
    assert_eq!(filtered[0].total_minor, 100);

    let unknown = engine
        .balance_series("alice", &[Uuid::new_v4()])
        .await
        .unwrap();
    assert!(unknown.is_empty());
}
