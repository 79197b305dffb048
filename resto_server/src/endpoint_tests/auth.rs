use actix_web::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use resto_engine::VoucherApi;
use serde_json::json;

use super::{helpers::send_request, mocks::MockStore};
use crate::{errors::BASIC_AUTH_REALM, routes::VouchersRoute};

fn configure(cfg: &mut ServiceConfig) {
    let mut store = MockStore::new();
    store.expect_search_vouchers().returning(|_| Ok(vec![]));
    cfg.service(VouchersRoute::<MockStore>::new()).app_data(web::Data::new(VoucherApi::new(store)));
}

fn basic(credentials: &str) -> (&'static str, String) {
    ("Authorization", format!("Basic {}", base64::encode(credentials)))
}

#[actix_web::test]
async fn no_credentials() {
    let _ = env_logger::try_init().ok();
    let res = send_request(TestRequest::get().uri("/vouchers"), configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers.get(WWW_AUTHENTICATE).unwrap(), BASIC_AUTH_REALM);
    assert_eq!(res.json(), json!({ "message": "Authentication required", "error": "UNAUTHORIZED" }));
}

#[actix_web::test]
async fn wrong_password() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/vouchers").insert_header(basic("cashier:hunter2"));
    let res = send_request(req, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn not_a_basic_auth_header() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/vouchers").insert_header(("Authorization", "Bearer abc.def.ghi"));
    let res = send_request(req, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn valid_credentials() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get()
        .uri("/vouchers")
        .insert_header(basic(&format!("{}:{}", super::helpers::TEST_USER, super::helpers::TEST_PASSWORD)));
    let res = send_request(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
}
