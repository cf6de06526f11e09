use actix_web::http::StatusCode;
use gws_common::Money;
use serde_json::{json, Value};
use wallet_engine::{db_types::EntryCategory, WalletDatabase};

use super::{
    helpers::{configure, get_request, new_test_db, post_request},
    mocks::StubGateway,
};

fn money(s: &str) -> Money {
    s.parse().expect("Not a valid amount")
}

#[actix_web::test]
async fn health_check() {
    let db = new_test_db().await;
    let (status, body) = get_request("/health", configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn fetching_a_new_wallet_creates_it_empty() {
    let db = new_test_db().await;
    let (status, body) = get_request("/wallet/5", configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let wallet: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(wallet["user_id"], 5);
    assert_eq!(wallet["balance"], "0.00");
}

#[actix_web::test]
async fn statement_returns_the_wallet_and_its_newest_entries() {
    let db = new_test_db().await;
    let wallet = db.fetch_or_create_wallet(1).await.unwrap();
    db.credit(wallet.id, money("100.00"), EntryCategory::Topup, None, Some("TX1".into()), None).await.unwrap();
    db.debit(wallet.id, money("40.00"), EntryCategory::Purchase, None, None).await.unwrap();

    let (status, body) = get_request("/wallet/1/history", configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let statement: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(statement["wallet"]["balance"], "60.00");
    let entries = statement["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], "debit");
    assert_eq!(entries[1]["type"], "credit");
}

#[actix_web::test]
async fn payment_debits_the_wallet_and_returns_the_entry() {
    let db = new_test_db().await;
    let wallet = db.fetch_or_create_wallet(1).await.unwrap();
    db.credit(wallet.id, money("100.00"), EntryCategory::Topup, None, None, None).await.unwrap();

    let params = json!({"user_id": 1, "amount": "40.00", "order_id": "ORD1"});
    let (status, body) = post_request("/wallet/pay", params, configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["wallet"]["balance"], "60.00");
    assert_eq!(result["entry"]["type"], "debit");
    assert_eq!(result["entry"]["category"], "purchase");
    assert_eq!(result["entry"]["reference_id"], "ORD1");
}

#[actix_web::test]
async fn overdraw_is_a_402_with_both_amounts() {
    let db = new_test_db().await;
    let wallet = db.fetch_or_create_wallet(1).await.unwrap();
    db.credit(wallet.id, money("100.00"), EntryCategory::Topup, None, None, None).await.unwrap();

    let params = json!({"user_id": 1, "amount": "150.00", "order_id": "ORD1"});
    let (status, body) = post_request("/wallet/pay", params, configure(db.clone(), StubGateway::new())).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["currentBalance"], "100.00");
    assert_eq!(error["requiredAmount"], "150.00");

    // The rejected payment must not have touched the wallet.
    let (_, body) = get_request("/wallet/1", configure(db, StubGateway::new())).await;
    let wallet: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(wallet["balance"], "100.00");
}

#[actix_web::test]
async fn non_positive_payment_amount_is_a_400() {
    let db = new_test_db().await;
    let params = json!({"user_id": 1, "amount": "0.00", "order_id": "ORD1"});
    let (status, _) = post_request("/wallet/pay", params, configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_amount_is_a_400() {
    let db = new_test_db().await;
    let params = json!({"user_id": 1, "amount": "1.2.3", "order_id": "ORD1"});
    let (status, _) = post_request("/wallet/pay", params, configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
