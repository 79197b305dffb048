use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{PaymentNumber, Transaction, TransactionStatus};

/// The only payment type that may be charged through the gateway.
pub const QRIS_PAYMENT_TYPE: &str = "qris";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDetails {
    /// The payment reference number of the transaction to charge
    pub order_id: PaymentNumber,
}

/// A request to charge a stored transaction through the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeTransactionRequest {
    pub payment_type: String,
    pub transaction_details: ChargeDetails,
}

/// An asynchronous payment status update, as posted by the gateway to the notification webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub order_id: PaymentNumber,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

impl PaymentNotification {
    pub fn reconciled_status(&self) -> TransactionStatus {
        reconcile_status(&self.transaction_status, self.payment_type.as_deref(), self.fraud_status.as_deref())
    }
}

/// Maps the gateway's transaction status vocabulary onto [`TransactionStatus`].
///
/// | gateway status                  | status      |
/// |---------------------------------|-------------|
/// | capture, settlement             | completed   |
/// | deny, cancel, expire, failure   | failed      |
/// | pending, or anything else       | pending     |
///
/// Card payments that the gateway's fraud detection flags as `challenge` become `challenge`, whatever the
/// transaction status says.
pub fn reconcile_status(
    transaction_status: &str,
    payment_type: Option<&str>,
    fraud_status: Option<&str>,
) -> TransactionStatus {
    if payment_type == Some("credit_card") && fraud_status == Some("challenge") {
        return TransactionStatus::Challenge;
    }
    match transaction_status {
        "capture" | "settlement" => TransactionStatus::Completed,
        "deny" | "cancel" | "expire" | "failure" => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusReport {
    pub details: Transaction,
    pub payment_number: PaymentNumber,
    pub status: TransactionStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for PaymentStatusReport {
    fn from(transaction: Transaction) -> Self {
        Self {
            payment_number: transaction.payment_number.clone(),
            status: transaction.status,
            updated_at: transaction.updated_at,
            details: transaction,
        }
    }
}
