use chrono::{Duration, Utc};
use cucumber::{then, when};
use resto_engine::{
    db_types::{CartItem, NewVoucher, PaymentMethod, Rupiah, TransactionStatus, TransactionType},
    payment_objects::PaymentNotification,
    test_utils::backdate_usage_logs,
    transaction_objects::TransactionRequest,
    TransactionError,
    VoucherError,
};

use crate::cucumber::RestoWorld;

async fn place_order(world: &mut RestoWorld, customer: String, amount: i64, method: String, voucher: Option<String>) {
    let request = TransactionRequest {
        transaction_type: TransactionType::Offline,
        payment_method: PaymentMethod::from(method),
        customer_name: customer,
        additional_note: None,
        voucher,
        status: None,
        cart: vec![CartItem {
            item_name: "Set menu".into(),
            quantity: 1,
            price: Rupiah::from(amount),
            sub_total: Rupiah::from(amount),
        }],
    };
    let result = world.system().transactions.create_transaction(request, Utc::now()).await;
    match result {
        Ok(tx) => {
            world.last_transaction = Some(tx);
            world.last_error = None;
        },
        Err(e) => {
            world.last_transaction = None;
            world.last_error = Some(e);
        },
    }
}

#[when(expr = "{word} orders items costing {int} paying by {word}")]
async fn order_without_voucher(world: &mut RestoWorld, customer: String, amount: i64, method: String) {
    place_order(world, customer, amount, method, None).await;
}

#[when(expr = "{word} orders items costing {int} paying by {word} with voucher {word}")]
async fn order_with_voucher(world: &mut RestoWorld, customer: String, amount: i64, method: String, code: String) {
    place_order(world, customer, amount, method, Some(code)).await;
}

#[when(expr = "the voucher {word} was last used {int} days ago")]
async fn voucher_used_earlier(world: &mut RestoWorld, code: String, days: i64) {
    let system = world.system();
    let voucher = system.vouchers.voucher_by_code(&code).await.expect("Voucher should exist");
    backdate_usage_logs(&system.db, voucher.id, Utc::now() - Duration::days(days)).await;
}

#[when(expr = "the voucher {word} is used up and expired")]
async fn voucher_used_up_and_expired(world: &mut RestoWorld, code: String) {
    let system = world.system();
    let voucher = system.vouchers.voucher_by_code(&code).await.expect("Voucher should exist");
    let update = NewVoucher {
        name: voucher.name,
        voucher_type: voucher.voucher_type,
        discount: voucher.discount,
        max_amount: voucher.amount,
        expired_at: Utc::now() - Duration::days(1),
    };
    system.vouchers.update_voucher(voucher.id, update).await.expect("Error updating voucher");
}

#[when(expr = "the gateway reports {word} for the last transaction")]
async fn gateway_notification(world: &mut RestoWorld, status: String) {
    let notification = PaymentNotification {
        order_id: world.last_transaction().payment_number.clone(),
        transaction_status: status,
        fraud_status: Some("accept".into()),
        payment_type: Some("qris".into()),
    };
    let updated =
        world.system().payments.process_notification(notification).await.expect("Error processing notification");
    world.last_transaction = Some(updated);
}

#[then(expr = "the transaction total is {int}")]
async fn total_is(world: &mut RestoWorld, total: i64) {
    assert_eq!(world.last_transaction().total, Rupiah::from(total));
}

#[then(expr = "the service charge is {int}")]
async fn service_charge_is(world: &mut RestoWorld, amount: i64) {
    assert_eq!(world.last_transaction().service_charge, Rupiah::from(amount));
}

#[then(expr = "the rounding is {int}")]
async fn rounding_is(world: &mut RestoWorld, amount: i64) {
    assert_eq!(world.last_transaction().rounding, Rupiah::from(amount));
}

#[then(expr = "the discount is {int}")]
async fn discount_is(world: &mut RestoWorld, amount: i64) {
    assert_eq!(world.last_transaction().discount, Rupiah::from(amount));
}

#[then(expr = "the transaction status is {word}")]
async fn status_is(world: &mut RestoWorld, status: String) {
    let expected = status.parse::<TransactionStatus>().expect("Not a valid status");
    assert_eq!(world.last_transaction().status, expected);
}

#[then(expr = "the transaction is rejected with {word}")]
async fn rejected_with(world: &mut RestoWorld, reason: String) {
    let err = world.last_error.as_ref().expect("The last transaction did not fail");
    let actual = match err {
        TransactionError::VoucherError(VoucherError::VoucherNotFound(_)) => "VoucherNotFound",
        TransactionError::VoucherError(VoucherError::VoucherAlreadyUsedToday(_)) => "VoucherAlreadyUsedToday",
        TransactionError::VoucherError(VoucherError::VoucherUsageLimitExceeded(_)) => "VoucherUsageLimitExceeded",
        TransactionError::VoucherError(VoucherError::VoucherExpired(_)) => "VoucherExpired",
        e => panic!("Unexpected error: {e}"),
    };
    assert_eq!(actual, reason);
}

#[then(expr = "voucher {word} has been used {int} times")]
async fn voucher_used(world: &mut RestoWorld, code: String, times: i64) {
    let voucher = world.system().vouchers.voucher_by_code(&code).await.expect("Voucher should exist");
    assert_eq!(voucher.amount, times);
}
