//! Human-readable reference numbers for new transactions.
//!
//! Both numbers carry a random suffix. Uniqueness is ultimately enforced by the database, and callers retry with
//! fresh numbers on a clash.
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::db_types::PaymentNumber;

/// `ORD-YYMMDD-XXXXXX`, with an upper-case alphanumeric suffix.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String =
        rand::thread_rng().sample_iter(&Alphanumeric).take(6).map(|c| char::from(c).to_ascii_uppercase()).collect();
    format!("ORD-{}-{suffix}", now.format("%y%m%d"))
}

/// `PAY-YYYYMMDDHHMMSS-NNNNNN`. This is also the order id that the payment gateway sees.
pub fn generate_payment_number(now: DateTime<Utc>) -> PaymentNumber {
    let suffix = rand::thread_rng().gen_range(0..1_000_000u32);
    PaymentNumber(format!("PAY-{}-{suffix:06}", now.format("%Y%m%d%H%M%S")))
}
