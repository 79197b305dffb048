use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use resto_engine::{
    db_types::{PaymentNumber, TransactionStatus},
    ChargeReceipt,
    GatewayError,
    PaymentApi,
    PaymentStatusApi,
};
use serde_json::json;

use super::{
    helpers::{auth_header, qris_transaction, send_request},
    mocks::{MockGateway, MockStore},
};
use crate::routes::{ChargeRoute, PaymentNotificationRoute, PaymentStatusRoute};

fn configure_charge(store: MockStore, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = PaymentApi::new(store, gateway);
        cfg.service(ChargeRoute::<MockStore, MockGateway>::new()).app_data(web::Data::new(api));
    }
}

fn configure_status(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = PaymentStatusApi::new(store);
        cfg.service(PaymentNotificationRoute::<MockStore>::new())
            .service(PaymentStatusRoute::<MockStore>::new())
            .app_data(web::Data::new(api));
    }
}

fn charge_request(payment_type: &str) -> serde_json::Value {
    json!({ "paymentType": payment_type, "transactionDetails": { "orderId": "PAY-20240501123000-000042" } })
}

fn known_transaction(store: &mut MockStore) {
    store
        .expect_fetch_transaction_by_payment_number()
        .withf(|pn| pn.as_str() == "PAY-20240501123000-000042")
        .returning(|_| Ok(Some(qris_transaction())));
}

//----------------------------------------------   Charges  ----------------------------------------------------

#[actix_web::test]
async fn charge_qris_transaction() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    let mut gateway = MockGateway::new();
    gateway
        .expect_submit_charge()
        .withf(|order| {
            order.payment_type == "qris" &&
                order.gross_amount() == 19_000 &&
                order.lines.len() == 4 &&
                order.lines[0].price == 20_000 &&
                order.lines[2].price == -2_000
        })
        .times(1)
        .returning(|_| {
            Ok(ChargeReceipt {
                status_code: "201".into(),
                status_message: "QRIS transaction is created".into(),
                body: json!({
                    "status_code": "201",
                    "status_message": "QRIS transaction is created",
                    "order_id": "PAY-20240501123000-000042",
                    "actions": [{ "name": "generate-qr-code", "method": "GET", "url": "https://example.com/qr" }]
                }),
            })
        });
    let req = TestRequest::post().uri("/payments").insert_header(auth_header()).set_json(charge_request("qris"));
    let res = send_request(req, configure_charge(store, gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Transaction payment successful");
    assert_eq!(body["data"]["actions"][0]["name"], "generate-qr-code");
    assert_eq!(body["data"]["order_id"], "PAY-20240501123000-000042");
}

#[actix_web::test]
async fn only_qris_may_be_charged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_transaction_by_payment_number().never();
    let mut gateway = MockGateway::new();
    gateway.expect_submit_charge().never();
    let req = TestRequest::post().uri("/payments").insert_header(auth_header()).set_json(charge_request("gopay"));
    let res = send_request(req, configure_charge(store, gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert_eq!(body["message"], "Payment type is not allowed");
    assert_eq!(body["error"], "PAYMENT_TYPE_NOT_ALLOWED");
}

#[actix_web::test]
async fn charge_unknown_transaction() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_transaction_by_payment_number().returning(|_| Ok(None));
    let mut gateway = MockGateway::new();
    gateway.expect_submit_charge().never();
    let req = TestRequest::post().uri("/payments").insert_header(auth_header()).set_json(charge_request("qris"));
    let res = send_request(req, configure_charge(store, gateway)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["message"], "Transaction not found");
}

#[actix_web::test]
async fn gateway_rejection_is_passed_through() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    let mut gateway = MockGateway::new();
    gateway.expect_submit_charge().times(1).returning(|_| {
        Err(GatewayError::Rejected {
            status_code: "406".into(),
            message: "The request could not be processed due to duplicate order ID".into(),
        })
    });
    let req = TestRequest::post().uri("/payments").insert_header(auth_header()).set_json(charge_request("qris"));
    let res = send_request(req, configure_charge(store, gateway)).await;
    assert_eq!(res.status, StatusCode::NOT_ACCEPTABLE);
    let body = res.json();
    assert_eq!(body["message"], "The request could not be processed due to duplicate order ID");
    assert_eq!(body["error"], "PAYMENT_GATEWAY_ERROR");
}

#[actix_web::test]
async fn invalid_gateway_response() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    let mut gateway = MockGateway::new();
    gateway.expect_submit_charge().returning(|_| Err(GatewayError::InvalidResponse("<html>".into())));
    let req = TestRequest::post().uri("/payments").insert_header(auth_header()).set_json(charge_request("qris"));
    let res = send_request(req, configure_charge(store, gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "INVALID_GATEWAY_RESPONSE");
}

#[actix_web::test]
async fn charge_requires_an_order_id() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_submit_charge().never();
    let req = TestRequest::post()
        .uri("/payments")
        .insert_header(auth_header())
        .set_json(json!({ "paymentType": "qris", "transactionDetails": { "orderId": "  " } }));
    let res = send_request(req, configure_charge(MockStore::new(), gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"]["details"][0]["field"], "transactionDetails.orderId");
}

//----------------------------------------------   Notifications  ----------------------------------------------------

#[actix_web::test]
async fn settlement_completes_transaction() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    store
        .expect_update_payment_status()
        .withf(|id, status, fraud| *id == 42 && *status == TransactionStatus::Completed && fraud.as_deref() == Some("accept"))
        .times(1)
        .returning(|_, status, fraud_status| {
            let mut t = qris_transaction();
            t.status = status;
            t.fraud_status = fraud_status;
            Ok(t)
        });
    let notification = json!({
        "order_id": "PAY-20240501123000-000042",
        "transaction_status": "settlement",
        "fraud_status": "accept",
        "payment_type": "qris"
    });
    // No credentials: the gateway does not authenticate with basic auth
    let req = TestRequest::post().uri("/payments/notification").set_json(notification);
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "message": "Notification processed successfully", "data": null }));
}

#[actix_web::test]
async fn card_challenge_is_flagged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    store
        .expect_update_payment_status()
        .withf(|_, status, _| *status == TransactionStatus::Challenge)
        .times(1)
        .returning(|_, status, _| {
            let mut t = qris_transaction();
            t.status = status;
            Ok(t)
        });
    let notification = json!({
        "order_id": "PAY-20240501123000-000042",
        "transaction_status": "pending",
        "fraud_status": "challenge",
        "payment_type": "credit_card"
    });
    let req = TestRequest::post().uri("/payments/notification").set_json(notification);
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["message"], "Notification processed successfully");
}

#[actix_web::test]
async fn unknown_order_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_transaction_by_payment_number().returning(|_| Ok(None));
    store.expect_update_payment_status().never();
    let notification = json!({
        "order_id": "PAY-19990101000000-000001",
        "transaction_status": "settlement",
        "fraud_status": "accept",
        "payment_type": "qris"
    });
    let req = TestRequest::post().uri("/payments/notification").set_json(notification);
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "message": "Notification received", "data": null }));
}

#[actix_web::test]
async fn malformed_notification_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_transaction_by_payment_number().never();
    let req = TestRequest::post()
        .uri("/payments/notification")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"order_id\": 12, ");
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["message"], "Notification received");
}

//----------------------------------------------   Status  ----------------------------------------------------

#[actix_web::test]
async fn payment_status_report() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    known_transaction(&mut store);
    let req = TestRequest::get().uri("/payments/status/PAY-20240501123000-000042").insert_header(auth_header());
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Payment status retrieved successfully");
    assert_eq!(body["data"]["paymentNumber"], "PAY-20240501123000-000042");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["updatedAt"], "2024-05-01T12:30:00Z");
    assert_eq!(body["data"]["details"]["id"], 42);
}

#[actix_web::test]
async fn payment_status_unknown() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_transaction_by_payment_number()
        .withf(|pn| *pn == PaymentNumber::new("PAY-NOPE"))
        .returning(|_| Ok(None));
    let req = TestRequest::get().uri("/payments/status/PAY-NOPE").insert_header(auth_header());
    let res = send_request(req, configure_status(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["error"], "TRANSACTION_NOT_FOUND");
}
