//! Restaurant Payment Engine
//!
//! This library holds the core logic of the restaurant payment server. It is independent of the HTTP layer and of
//! any particular payment gateway.
//!
//! The library is divided into these sections:
//! 1. Domain types ([`mod@db_types`]): transactions, vouchers, usage logs, cart lines and their enums.
//! 2. Backend contracts ([`mod@traits`]): the storage traits a database must implement, and the [`PaymentGateway`]
//!    trait for external payment processors. SQLite is the supported backend ([`SqliteDatabase`]).
//! 3. The public API ([`mod@resto_api`]): pricing, voucher eligibility, transaction creation, gateway charges and
//!    notification reconciliation.
pub mod db_types;
pub mod helpers;
pub mod resto_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use resto_api::{
    payment_api::PaymentApi,
    payment_objects,
    payment_status_api::PaymentStatusApi,
    pricing,
    transaction_flow_api::TransactionFlowApi,
    transaction_objects,
    voucher_api::{VoucherApi, VoucherUsageSummary},
};
pub use traits::{
    ChargeLine,
    ChargeOrder,
    ChargeReceipt,
    GatewayError,
    PaymentGateway,
    TransactionError,
    TransactionManagement,
    VoucherError,
    VoucherManagement,
};
