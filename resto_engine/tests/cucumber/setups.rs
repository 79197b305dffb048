use chrono::{Duration, Utc};
use cucumber::given;
use resto_engine::{
    db_types::{NewVoucher, VoucherType},
    test_utils::set_voucher_redemptions,
};

use crate::cucumber::{RestaurantSystem, RestoWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut RestoWorld) {
    let system = RestaurantSystem::new().await;
    world.system = Some(system);
}

//      Given a percent voucher STAFF worth 100 with 0 of 30 uses, expiring in 30 days
#[given(expr = "a {word} voucher {word} worth {int} with {int} of {int} uses, expiring in {int} days")]
async fn voucher(world: &mut RestoWorld, kind: String, name: String, discount: i64, used: i64, max: i64, days: i64) {
    let voucher_type = match kind.as_str() {
        "percent" => VoucherType::Percent,
        "fixed" => VoucherType::Fixed,
        k => panic!("Unknown voucher type {k}"),
    };
    let voucher = NewVoucher {
        name,
        voucher_type,
        discount,
        max_amount: max,
        expired_at: Utc::now() + Duration::days(days),
    };
    let system = world.system();
    let voucher = system.vouchers.create_voucher(voucher).await.expect("Error creating voucher");
    if used > 0 {
        set_voucher_redemptions(&system.db, voucher.id, used).await;
    }
}
