use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use resto_engine::{PaymentApi, PaymentStatusApi, SqliteDatabase, TransactionFlowApi, VoucherApi};

use crate::{
    config::ServerConfig,
    errors::{ServerError, ValidationDetail},
    integrations::MidtransGateway,
    routes::{
        health,
        transactions_health,
        vouchers_health,
        ChargeRoute,
        CreateTransactionRoute,
        CreateVoucherRoute,
        DeleteVoucherRoute,
        PaymentNotificationRoute,
        PaymentStatusRoute,
        UpdateVoucherRoute,
        VoucherDetailRoute,
        VouchersRoute,
        VouchersUsedTodayRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway =
        MidtransGateway::new(config.midtrans.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::InitializeError(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: MidtransGateway,
) -> Result<Server, ServerError> {
    if !config.auth.is_configured() {
        warn!("🔐️ No basic auth credentials are configured. Protected routes will refuse every request.");
    }
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let transactions_api =
            TransactionFlowApi::new(db.clone()).with_client_status_trust(config.trust_client_status);
        let payments_api = PaymentApi::new(db.clone(), gateway.clone());
        let payment_status_api = PaymentStatusApi::new(db.clone());
        let vouchers_api = VoucherApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("resto::access_log"))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .app_data(web::Data::new(config.auth.clone()))
            .app_data(web::Data::new(transactions_api))
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(payment_status_api))
            .app_data(web::Data::new(vouchers_api))
            .service(health)
            .service(transactions_health)
            .service(vouchers_health)
            .service(CreateTransactionRoute::<SqliteDatabase>::new())
            .service(PaymentNotificationRoute::<SqliteDatabase>::new())
            .service(PaymentStatusRoute::<SqliteDatabase>::new())
            .service(ChargeRoute::<SqliteDatabase, MidtransGateway>::new())
            .service(VouchersUsedTodayRoute::<SqliteDatabase>::new())
            .service(VoucherDetailRoute::<SqliteDatabase>::new())
            .service(VouchersRoute::<SqliteDatabase>::new())
            .service(CreateVoucherRoute::<SqliteDatabase>::new())
            .service(UpdateVoucherRoute::<SqliteDatabase>::new())
            .service(DeleteVoucherRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Bodies that cannot be deserialized into the expected request are validation failures, and use the same envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::ValidationFailed(vec![ValidationDetail::new("body", err.to_string())]).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request path. {err}");
        ServerError::ValidationFailed(vec![ValidationDetail::new("path", err.to_string())]).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting query string. {err}");
        ServerError::ValidationFailed(vec![ValidationDetail::new("query", err.to_string())]).into()
    })
}
