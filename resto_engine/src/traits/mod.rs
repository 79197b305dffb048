//! # Storage and gateway contracts
//!
//! This module defines the behaviour that backends must expose to be driven by the engine's public API.
//!
//! * [`VoucherManagement`] provides voucher CRUD, usage-log queries and the counters used for reporting.
//! * [`TransactionManagement`] stores transactions and reconciles their payment status. Any store that can persist
//!   transactions must also be a voucher store, because redeeming a voucher happens in the same atomic unit as
//!   inserting the transaction.
//! * [`PaymentGateway`] submits charges to an external payment processor.
mod payment_gateway;
mod transaction_management;
mod voucher_management;

pub use payment_gateway::{ChargeLine, ChargeOrder, ChargeReceipt, GatewayError, PaymentGateway};
pub use transaction_management::{TransactionError, TransactionManagement};
pub use voucher_management::{VoucherError, VoucherManagement};
