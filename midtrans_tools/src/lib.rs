//! A small typed client for the parts of the Midtrans Core API that the restaurant server uses.
//!
//! Only the `/v2/charge` endpoint is wrapped. Webhook notifications are plain JSON and are decoded by the server.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::MidtransApi;
pub use config::{MidtransConfig, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use data_objects::{ChargeRequest, ChargeResponse, CustomerDetails, ItemDetail, TransactionDetails};
pub use error::MidtransApiError;
