use std::time::Duration;

use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use serde_json::Value;
use wallet_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    ReconciliationApi,
    SqliteDatabase,
    WalletApi,
};

use super::mocks::StubGateway;
use crate::routes::{health, PaymentRoute, TopupInitiateRoute, TopupRoute, WalletHistoryRoute, WalletRoute};

pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 10).await.expect("Error creating database")
}

/// Registers the wallet routes against a real (throwaway) database and a stub gateway, the same
/// way `server.rs` wires the production instance.
pub fn configure(db: SqliteDatabase, gateway: StubGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let wallet_api = WalletApi::new(db.clone());
        let reconciliation_api = ReconciliationApi::new(db, gateway, Duration::from_millis(250));
        cfg.service(health)
            .service(WalletRoute::<SqliteDatabase>::new())
            .service(WalletHistoryRoute::<SqliteDatabase>::new())
            .service(TopupInitiateRoute::<SqliteDatabase, StubGateway>::new())
            .service(TopupRoute::<SqliteDatabase, StubGateway>::new())
            .service(PaymentRoute::<SqliteDatabase>::new())
            .app_data(web::Data::new(wallet_api))
            .app_data(web::Data::new(reconciliation_api));
    }
}

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::get().uri(path).to_request();
    send(req, configure).await
}

pub async fn post_request<F>(path: &str, body: Value, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    send(req, configure).await
}

async fn send<F>(req: actix_http::Request, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init().ok();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::call_service(&service, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
