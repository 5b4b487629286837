use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "secret".into()],
    ))
    .await
    .unwrap();

    let engine = engine::Engine::builder().database(db.clone()).build();
    server::app(engine, db)
}

fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth("alice", "secret"));
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_credentials_are_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .header(header::AUTHORIZATION, basic_auth("alice", "wrong"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_create_and_list_roundtrip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/accounts",
            Some(json!({
                "name": "Everyday",
                "bank_name": "Acme Bank",
                // Unknown values coerce instead of failing.
                "account_type": "crypto",
                "currency": "JPY",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(request("GET", "/accounts", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let accounts = json_body(response).await;
    assert_eq!(accounts.as_array().unwrap().len(), 1);
    assert_eq!(accounts[0]["name"], "Everyday");
    assert_eq!(accounts[0]["kind"], "transactions");
    assert_eq!(accounts[0]["currency"], "AUD");
}

#[tokio::test]
async fn balance_upsert_updates_in_place() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/balances",
            Some(json!({"month": "2025-01", "balance": "10.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = json_body(response).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/balances",
            Some(json!({"month": "2025-01", "balance": "25.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = json_body(response).await;
    assert_eq!(first["id"], second["id"]);

    let response = app.oneshot(request("GET", "/balances", None)).await.unwrap();
    let rows = json_body(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["balance_minor"], 2500);
}

#[tokio::test]
async fn invalid_amounts_are_rejected_before_any_write() {
    let app = test_app().await;

    for balance in ["abc", "-5", "1.234"] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/balances",
                Some(json!({"month": "2025-01", "balance": balance})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/balances",
            Some(json!({"month": "not-a-month", "balance": "10.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.oneshot(request("GET", "/balances", None)).await.unwrap();
    let rows = json_body(response).await;
    assert!(rows.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn metrics_worked_example() {
    let app = test_app().await;

    for (month, balance, interest) in [("2025-01", "10.00", "0"), ("2025-02", "12.00", "0.20")] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/balances",
                Some(json!({
                    "month": month,
                    "balance": balance,
                    "interest_earned": interest,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/incomes",
            Some(json!({"month": "2025-02", "amount": "4.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(request("GET", "/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = json_body(response).await;

    assert_eq!(metrics["months"][0]["month"], "2025-02");
    assert_eq!(metrics["months"][0]["savings_minor"], 180);
    assert_eq!(metrics["months"][0]["spend_minor"], 220);
    assert_eq!(metrics["months"][1]["savings_minor"], Value::Null);
    assert_eq!(metrics["current_total_minor"], 1200);
}

#[tokio::test]
async fn export_serves_csv() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/balances",
            Some(json!({"month": "2025-01", "balance": "10.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request("GET", "/export?sheet=summary", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.starts_with("Month,Total balance,Income,Spend,Save,Save %"));
    assert!(body.contains("Jan 2025"));
}

#[tokio::test]
async fn wipe_requires_confirmation_header() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/balances",
            Some(json!({"month": "2025-01", "balance": "10.00"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("DELETE", "/data", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut confirmed = request("DELETE", "/data", None);
    confirmed
        .headers_mut()
        .insert("x-confirm-wipe", "yes".parse().unwrap());
    let response = app.clone().oneshot(confirmed).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = json_body(response).await;
    assert_eq!(summary["balances_deleted"], 1);

    let response = app.oneshot(request("GET", "/balances", None)).await.unwrap();
    let rows = json_body(response).await;
    assert!(rows.as_array().unwrap().is_empty());
}
