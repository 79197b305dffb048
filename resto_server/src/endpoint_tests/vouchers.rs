use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use resto_engine::{db_types::VoucherType, VoucherApi, VoucherError};
use serde_json::json;

use super::{
    helpers::{auth_header, send_request, voucher},
    mocks::MockStore,
};
use crate::routes::{
    CreateVoucherRoute,
    DeleteVoucherRoute,
    UpdateVoucherRoute,
    VoucherDetailRoute,
    VouchersRoute,
    VouchersUsedTodayRoute,
};

fn configure_with(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = VoucherApi::new(store);
        cfg.service(VouchersUsedTodayRoute::<MockStore>::new())
            .service(VoucherDetailRoute::<MockStore>::new())
            .service(VouchersRoute::<MockStore>::new())
            .service(CreateVoucherRoute::<MockStore>::new())
            .service(UpdateVoucherRoute::<MockStore>::new())
            .service(DeleteVoucherRoute::<MockStore>::new())
            .app_data(web::Data::new(api));
    }
}

fn new_voucher_json() -> serde_json::Value {
    json!({ "name": "STAFF", "type": "percent", "discount": 100, "maxAmount": 30, "expiredAt": "2030-01-01T00:00:00Z" })
}

#[actix_web::test]
async fn list_vouchers_with_search() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_search_vouchers()
        .withf(|search| search.as_deref() == Some("hemat"))
        .times(1)
        .returning(|_| Ok(vec![voucher(1, "HEMAT10"), voucher(2, "hemat20")]));
    let req = TestRequest::get().uri("/vouchers?search=hemat").insert_header(auth_header());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Vouchers retrieved successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["type"], "percent");
    assert_eq!(body["data"][0]["maxAmount"], 100);
}

#[actix_web::test]
async fn list_all_vouchers() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_search_vouchers().withf(|search| search.is_none()).times(1).returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/vouchers").insert_header(auth_header());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"], json!([]));
}

#[actix_web::test]
async fn todays_usage() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_count_vouchers().returning(|| Ok(12));
    store.expect_count_usage_logs_between().withf(|since, until| since < until).returning(|_, _| Ok(4));
    let req = TestRequest::get().uri("/vouchers/today/used").insert_header(auth_header());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"], json!({ "total": 12, "used": 4 }));
}

#[actix_web::test]
async fn voucher_detail_is_public() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_voucher_by_name().withf(|name| name == "HEMAT10").returning(|_| Ok(Some(voucher(1, "HEMAT10"))));
    let req = TestRequest::get().uri("/vouchers/HEMAT10/detail");
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Voucher retrieved successfully");
    assert_eq!(body["data"]["name"], "HEMAT10");
}

#[actix_web::test]
async fn voucher_detail_not_found() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_voucher_by_name().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/vouchers/NOPE/detail");
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let body = res.json();
    assert_eq!(body["message"], "Voucher not found");
    assert_eq!(body["error"], "VOUCHER_NOT_FOUND");
}

#[actix_web::test]
async fn create_voucher() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_insert_voucher()
        .withf(|v| v.name == "STAFF" && v.voucher_type == VoucherType::Percent && v.max_amount == 30)
        .times(1)
        .returning(|v| {
            let mut stored = voucher(9, &v.name);
            stored.discount = v.discount;
            stored.max_amount = v.max_amount;
            Ok(stored)
        });
    let req = TestRequest::post().uri("/vouchers").insert_header(auth_header()).set_json(new_voucher_json());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Voucher created successfully");
    assert_eq!(body["data"]["id"], 9);
    assert_eq!(body["data"]["amount"], 0);
}

#[actix_web::test]
async fn duplicate_voucher() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_insert_voucher().returning(|v| Err(VoucherError::VoucherAlreadyExists(v.name)));
    let req = TestRequest::post().uri("/vouchers").insert_header(auth_header()).set_json(new_voucher_json());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert_eq!(body["message"], "Voucher already exists");
    assert_eq!(body["error"], "VOUCHER_ALREADY_EXISTS");
}

#[actix_web::test]
async fn invalid_voucher_type() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_insert_voucher().never();
    let mut body = new_voucher_json();
    body["type"] = json!("bogo");
    let req = TestRequest::post().uri("/vouchers").insert_header(auth_header()).set_json(body);
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"]["code"], "VALIDATION_FAILED");
}

#[actix_web::test]
async fn update_voucher() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_update_voucher().withf(|id, v| *id == 4 && v.discount == 100).times(1).returning(|id, v| {
        let mut stored = voucher(id, &v.name);
        stored.discount = v.discount;
        stored.amount = 7;
        Ok(stored)
    });
    let req = TestRequest::put().uri("/vouchers/4").insert_header(auth_header()).set_json(new_voucher_json());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Voucher updated successfully");
    assert_eq!(body["data"]["amount"], 7);
}

#[actix_web::test]
async fn update_missing_voucher() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_update_voucher().returning(|id, _| Err(VoucherError::VoucherIdNotFound(id)));
    let req = TestRequest::put().uri("/vouchers/404").insert_header(auth_header()).set_json(new_voucher_json());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["message"], "Voucher not found");
}

#[actix_web::test]
async fn voucher_ids_are_numeric() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_delete_voucher().never();
    let req = TestRequest::delete().uri("/vouchers/abc").insert_header(auth_header());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"]["code"], "VALIDATION_FAILED");
}

#[actix_web::test]
async fn delete_voucher() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_delete_voucher().withf(|id| *id == 2).times(1).returning(|id| Ok(voucher(id, "OLD")));
    let req = TestRequest::delete().uri("/vouchers/2").insert_header(auth_header());
    let res = send_request(req, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["message"], "Voucher deleted successfully");
    assert_eq!(body["data"]["name"], "OLD");
}
