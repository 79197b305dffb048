use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MidtransApiError;

/// Body of a `POST /v2/charge` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub payment_type: String,
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    pub item_details: Vec<ItemDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
}

impl ChargeRequest {
    /// Builds a charge request whose `gross_amount` is the sum of `price * quantity` over the line items. Midtrans
    /// rejects requests where the two disagree.
    pub fn new(payment_type: &str, order_id: &str, customer: CustomerDetails, items: Vec<ItemDetail>) -> Self {
        let gross_amount = items.iter().map(|i| i.price * i64::from(i.quantity)).sum();
        Self {
            payment_type: payment_type.to_string(),
            transaction_details: TransactionDetails { order_id: order_id.to_string(), gross_amount },
            customer_details: customer,
            item_details: items,
        }
    }
}

/// A successful charge response. The full body is kept in `raw` since its shape depends on the payment type
/// (QRIS responses carry `actions` and `qr_string`, for instance).
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeResponse {
    pub status_code: String,
    pub status_message: String,
    pub transaction_id: Option<String>,
    pub raw: Value,
}

impl ChargeResponse {
    /// Midtrans reports `status_code` as a string, but be lenient and accept a number too.
    pub fn status_code_of(body: &Value) -> Option<String> {
        match &body["status_code"] {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn try_from_value(http_status: u16, body: Value) -> Result<Self, MidtransApiError> {
        let status_code = Self::status_code_of(&body)
            .ok_or_else(|| MidtransApiError::InvalidResponse { http_status, body: body.to_string() })?;
        let status_message = body["status_message"].as_str().unwrap_or_default().to_string();
        let transaction_id = body["transaction_id"].as_str().map(String::from);
        Ok(Self { status_code, status_message, transaction_id, raw: body })
    }

    pub fn is_created(&self) -> bool {
        self.status_code == "201"
    }
}
