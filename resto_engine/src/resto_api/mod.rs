//! # Restaurant engine public API
//!
//! The `resto_api` module exposes the programmatic API of the engine. Each API is created by supplying a backend that
//! implements the traits it needs:
//!
//! * [`transaction_flow_api`] records new transactions, redeeming vouchers along the way.
//! * [`voucher_api`] manages the voucher catalogue and checks voucher eligibility.
//! * [`payment_api`] charges stored transactions through a [`PaymentGateway`](crate::traits::PaymentGateway).
//! * [`payment_status_api`] applies gateway notifications and reports payment status.
//! * [`pricing`] contains the pure pricing rules.
//!
//! ```rust,ignore
//! use resto_engine::{SqliteDatabase, VoucherApi};
//! let db = SqliteDatabase::new_with_url("sqlite://data/resto_store.db", 25).await?;
//! let api = VoucherApi::new(db);
//! let vouchers = api.search(Some("staff".into())).await?;
//! ```
pub mod payment_api;
pub mod payment_objects;
pub mod payment_status_api;
pub mod pricing;
pub mod transaction_flow_api;
pub mod transaction_objects;
pub mod voucher_api;
