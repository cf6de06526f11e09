use actix_web::http::StatusCode;
use serde_json::{json, Value};
use wallet_engine::GatewayStatus;

use super::{
    helpers::{configure, get_request, new_test_db, post_request},
    mocks::StubGateway,
};

async fn initiate(db: &wallet_engine::SqliteDatabase, gateway: &StubGateway, user_id: i64, amount: &str) -> String {
    let params = json!({"user_id": user_id, "amount": amount});
    let (status, body) =
        post_request("/wallet/topup/initiate", params, configure(db.clone(), gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    result["gateway_transaction_id"].as_str().unwrap().to_string()
}

#[actix_web::test]
async fn initiate_returns_the_gateway_transaction_id() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 1, "25.00").await;
    assert_eq!(txid, "gwtx-0001");

    // Initiation alone must not create a wallet or move money.
    let (_, body) = get_request("/wallet/1", configure(db, gateway)).await;
    let wallet: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(wallet["balance"], "0.00");
}

#[actix_web::test]
async fn initiate_when_the_gateway_is_down_is_a_502() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    gateway.set_unreachable(true);
    let params = json!({"user_id": 1, "amount": "25.00"});
    let (status, _) = post_request("/wallet/topup/initiate", params, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn confirm_before_settlement_is_a_202() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 1, "25.00").await;

    let params = json!({"external_transaction_id": txid});
    let (status, _) = post_request("/wallet/topup", params, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn settled_topup_credits_and_returns_the_wallet() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 7, "40.00").await;
    gateway.set_status(&txid, GatewayStatus::Completed);

    // The client-side amount and user hints are deliberately wrong. Only the recorded request
    // counts.
    let params = json!({"external_transaction_id": txid, "amount": "999.00", "user_id": 999});
    let (status, body) = post_request("/wallet/topup", params, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["wallet"]["user_id"], 7);
    assert_eq!(result["wallet"]["balance"], "40.00");
    assert_eq!(result["entry"]["type"], "credit");
    assert_eq!(result["entry"]["category"], "topup");
    assert_eq!(result["entry"]["external_transaction_id"], txid.as_str());
}

#[actix_web::test]
async fn replayed_confirmation_does_not_credit_twice() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 7, "40.00").await;
    gateway.set_status(&txid, GatewayStatus::Completed);

    let params = json!({"external_transaction_id": txid});
    let (status, _) = post_request("/wallet/topup", params.clone(), configure(db.clone(), gateway.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_request("/wallet/topup", params, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["wallet"]["balance"], "40.00");
}

#[actix_web::test]
async fn failed_topup_is_a_422_and_never_credits() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 2, "15.00").await;
    gateway.set_status(&txid, GatewayStatus::Failed);

    let params = json!({"external_transaction_id": txid});
    let (status, body) = post_request("/wallet/topup", params, configure(db.clone(), gateway.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["success"], false);

    let (_, body) = get_request("/wallet/2", configure(db, gateway)).await;
    let wallet: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(wallet["balance"], "0.00");
}

#[actix_web::test]
async fn unreachable_gateway_at_confirm_time_is_a_202() {
    let db = new_test_db().await;
    let gateway = StubGateway::new();
    let txid = initiate(&db, &gateway, 3, "60.00").await;
    gateway.set_unreachable(true);

    let params = json!({"external_transaction_id": txid});
    let (status, _) = post_request("/wallet/topup", params, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn confirming_an_unknown_transaction_is_a_404() {
    let db = new_test_db().await;
    let params = json!({"external_transaction_id": "no-such-tx"});
    let (status, _) = post_request("/wallet/topup", params, configure(db, StubGateway::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
