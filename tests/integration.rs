use tal::api::{build_router, AppState};
use tal::Ledger;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};

use chrono::DateTime;

use http_body_util::BodyExt;

use serde_json::{json, Value};

use tower::ServiceExt;

fn build_app() -> Router {
    build_router(Arc::new(AppState::new(Ledger::new())))
}

fn test_account() -> Value {
    json!({
        "accountNumber": "12345",
        "name": "Alice Doe",
        "balance": 1000,
        "currency": "USD"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    read_response(app, request).await
}

/// Sends `body` as is, without a content type
async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();

    read_response(app, request).await
}

async fn read_response(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create_test_account(app: &Router) {
    let (status, _) = send(app, "POST", "/api/accounts", Some(test_account())).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn list_accounts_is_empty_at_first() {
    let app = build_app();

    let (status, body) = send(&app, "GET", "/api/accounts", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_account() {
    let app = build_app();

    let (status, body) = send(&app, "POST", "/api/accounts", Some(test_account())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["accountNumber"], "12345");
    assert_eq!(body["name"], "Alice Doe");
    assert_eq!(body["balance"], 1000);
    assert_eq!(body["currency"], "USD");

    let created_at = body["createdAt"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(created_at).is_ok());

    let (_, body) = send(&app, "GET", "/api/accounts", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_account_with_missing_fields_is_rejected() {
    let app = build_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(json!({ "name": "Test User" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));
}

#[tokio::test]
async fn create_account_with_non_numeric_balance_is_rejected() {
    let app = build_app();

    let mut input = test_account();
    input["balance"] = json!("lots");

    let (status, body) = send(&app, "POST", "/api/accounts", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));
}

#[tokio::test]
async fn create_account_with_too_many_decimal_places_is_rejected() {
    let app = build_app();

    let mut input = test_account();
    input["balance"] = json!(0.12345);

    let (status, body) = send(&app, "POST", "/api/accounts", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));

    let (_, body) = send(&app, "GET", "/api/accounts", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_duplicate_account_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(&app, "POST", "/api/accounts", Some(test_account())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Account already exists" }));
}

#[tokio::test]
async fn get_account() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(&app, "GET", "/api/accounts/12345", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accountNumber"], "12345");
    assert_eq!(body["name"], "Alice Doe");
    assert_eq!(body["balance"], 1000);
}

#[tokio::test]
async fn numeric_account_number_matches_path() {
    let app = build_app();

    let mut input = test_account();
    input["accountNumber"] = json!(777);

    let (status, _) = send(&app, "POST", "/api/accounts", Some(input)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/accounts/777", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accountNumber"], "777");
}

#[tokio::test]
async fn float_account_number_matches_path() {
    let app = build_app();

    let mut input = test_account();
    input["accountNumber"] = json!(777.0);

    let (status, body) = send(&app, "POST", "/api/accounts", Some(input)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["accountNumber"], "777");

    let mut input = test_account();
    input["accountNumber"] = json!(777.5);

    let (status, body) = send(&app, "POST", "/api/accounts", Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let app = build_app();
    let not_found = json!({ "error": "Account not found" });

    let requests = vec![
        ("GET", "/api/accounts/99999", None),
        ("PUT", "/api/accounts/99999", Some(json!({ "name": "New Name" }))),
        ("DELETE", "/api/accounts/99999", None),
        ("POST", "/api/accounts/99999/deposit", Some(json!({ "amount": 500 }))),
        ("POST", "/api/accounts/99999/withdraw", Some(json!({ "amount": 500 }))),
    ];

    for (method, uri, body) in requests.into_iter() {
        let (status, body) = send(&app, method, uri, body).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, not_found, "{method} {uri}");
    }
}

#[tokio::test]
async fn update_account() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/accounts/12345",
        Some(json!({ "name": "Alice Smith", "balance": 1500 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice Smith");
    assert_eq!(body["balance"], 1500);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn update_account_with_negative_balance_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/accounts/12345",
        Some(json!({ "balance": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));

    let (_, body) = send(&app, "GET", "/api/accounts/12345", None).await;
    assert_eq!(body["balance"], 1000);
}

#[tokio::test]
async fn update_account_without_body_changes_nothing() {
    let app = build_app();
    create_test_account(&app).await;

    let (_, before) = send(&app, "GET", "/api/accounts/12345", None).await;

    let (status, body) = send(&app, "PUT", "/api/accounts/12345", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, before);

    let (status, body) = send_raw(&app, "PUT", "/api/accounts/12345", "  ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, before);
}

#[tokio::test]
async fn update_account_without_content_type() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send_raw(
        &app,
        "PUT",
        "/api/accounts/12345",
        r#"{ "name": "Alice Smith" }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice Smith");
    assert_eq!(body["balance"], 1000);
}

#[tokio::test]
async fn update_account_with_unreadable_body() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send_raw(&app, "PUT", "/api/accounts/12345", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input" }));

    let (status, body) = send_raw(&app, "PUT", "/api/accounts/99999", "not json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Account not found" }));

    let (status, body) = send_raw(&app, "PUT", "/api/accounts/99999", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Account not found" }));
}

#[tokio::test]
async fn delete_account() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(&app, "DELETE", "/api/accounts/12345", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Account deleted" }));

    let (status, _) = send(&app, "GET", "/api/accounts/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deposit() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/deposit",
        Some(json!({ "amount": 500 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 1500);
}

#[tokio::test]
async fn invalid_deposit_amount_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    let bodies = vec![json!({ "amount": -100 }), json!({ "amount": 0 }), json!({})];

    for body in bodies.into_iter() {
        let (status, response) = send(
            &app,
            "POST",
            "/api/accounts/12345/deposit",
            Some(body.clone()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response, json!({ "error": "Invalid deposit amount" }), "{body}");
    }
}

#[tokio::test]
async fn deposit_with_too_many_decimal_places_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    for amount in [0.00001, 0.00009, 10.12345] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/accounts/12345/deposit",
            Some(json!({ "amount": amount })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount}");
        assert_eq!(body, json!({ "error": "Invalid deposit amount" }), "{amount}");
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/deposit",
        Some(json!({ "amount": 0.0001 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 1000.0001);
}

#[tokio::test]
async fn withdraw() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/withdraw",
        Some(json!({ "amount": 500 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 500);
}

#[tokio::test]
async fn invalid_withdrawal_amount_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/withdraw",
        Some(json!({ "amount": -50 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid withdrawal amount" }));
}

#[tokio::test]
async fn withdrawal_with_too_many_decimal_places_is_rejected() {
    let app = build_app();
    create_test_account(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/withdraw",
        Some(json!({ "amount": 0.00009 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid withdrawal amount" }));

    let (_, body) = send(&app, "GET", "/api/accounts/12345", None).await;
    assert_eq!(body["balance"], 1000);
}

#[tokio::test]
async fn deposit_then_overdraw() {
    let app = build_app();
    create_test_account(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/deposit",
        Some(json!({ "amount": 500 })),
    )
    .await;
    assert_eq!(body["balance"], 1500);

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/12345/withdraw",
        Some(json!({ "amount": 5000 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Insufficient funds" }));

    let (_, body) = send(&app, "GET", "/api/accounts/12345", None).await;
    assert_eq!(body["balance"], 1500);
}

#[tokio::test]
async fn concurrent_withdrawals_never_overdraw() {
    let app = build_app();
    create_test_account(&app).await;

    let withdrawals = (0..20).map(|_| {
        let app = app.clone();
        tokio::spawn(async move {
            send(
                &app,
                "POST",
                "/api/accounts/12345/withdraw",
                Some(json!({ "amount": 100 })),
            )
            .await
            .0
        })
    });

    let mut succeeded = 0;
    for handle in withdrawals.collect::<Vec<_>>() {
        if handle.await.unwrap() == StatusCode::OK {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 10);

    let (_, body) = send(&app, "GET", "/api/accounts/12345", None).await;
    assert_eq!(body["balance"], 0);
}
