use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use wallet_engine::{HttpPaymentGateway, PaymentGateway, ReconciliationApi, SqliteDatabase, WalletApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, PaymentRoute, TopupInitiateRoute, TopupRoute, WalletHistoryRoute, WalletRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway =
        HttpPaymentGateway::new(config.gateway.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<G>(config: ServerConfig, db: SqliteDatabase, gateway: G) -> Result<Server, ServerError>
where G: PaymentGateway + Send + Sync + 'static {
    let status_timeout = config.gateway.timeout;
    let srv = HttpServer::new(move || {
        let wallet_api = WalletApi::new(db.clone());
        let reconciliation_api = ReconciliationApi::new(db.clone(), gateway.clone(), status_timeout);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gws::access_log"))
            .app_data(web::Data::new(wallet_api))
            .app_data(web::Data::new(reconciliation_api));
        let api_scope = web::scope("/api")
            .service(WalletRoute::<SqliteDatabase>::new())
            .service(WalletHistoryRoute::<SqliteDatabase>::new())
            .service(TopupInitiateRoute::<SqliteDatabase, G>::new())
            .service(TopupRoute::<SqliteDatabase, G>::new())
            .service(PaymentRoute::<SqliteDatabase>::new());
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
