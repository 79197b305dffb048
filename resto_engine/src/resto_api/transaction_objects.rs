use serde::{Deserialize, Serialize};

use crate::db_types::{CartItem, PaymentMethod, TransactionStatus, TransactionType};

/// A point-of-sale request to record a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub transaction_type: TransactionType,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    #[serde(default)]
    pub additional_note: Option<String>,
    /// The voucher code, if the customer is redeeming one
    #[serde(default)]
    pub voucher: Option<String>,
    /// The status the client believes the transaction has. Only honoured for non-cash payments, and only if the
    /// engine is configured to trust it.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    pub cart: Vec<CartItem>,
}

impl TransactionRequest {
    /// The voucher code with surrounding whitespace removed. Blank codes count as no voucher.
    pub fn voucher_code(&self) -> Option<&str> {
        self.voucher.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
