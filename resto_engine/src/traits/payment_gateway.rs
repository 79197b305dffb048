use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment gateway is not configured. {0}")]
    NotConfigured(String),
    #[error("Could not reach the payment gateway. {0}")]
    Unavailable(String),
    #[error("The payment gateway rejected the charge. Status {status_code}. {message}")]
    Rejected { status_code: String, message: String },
    #[error("The payment gateway sent an invalid response. {0}")]
    InvalidResponse(String),
}

/// One line of a charge. Prices are in whole rupiah and may be negative (discounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub id: String,
    pub name: String,
    pub price: i64,
}

/// Everything a gateway needs to charge a stored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeOrder {
    pub payment_type: String,
    /// The payment reference number of the transaction
    pub order_id: String,
    pub customer_name: String,
    pub lines: Vec<ChargeLine>,
}

impl ChargeOrder {
    pub fn gross_amount(&self) -> i64 {
        self.lines.iter().map(|l| l.price).sum()
    }
}

/// An accepted charge. `body` is the gateway's response as-is, since it carries payment-type specific data (e.g. the
/// QR string) that clients need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    pub status_code: String,
    pub status_message: String,
    pub body: Value,
}

/// An external payment processor.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Submit the charge exactly once. Implementations must not retry.
    async fn submit_charge(&self, order: ChargeOrder) -> Result<ChargeReceipt, GatewayError>;
}
