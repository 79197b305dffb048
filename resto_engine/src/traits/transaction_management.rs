use thiserror::Error;

use crate::{
    db_types::{NewTransaction, PaymentNumber, Transaction, TransactionStatus},
    traits::{GatewayError, VoucherError, VoucherManagement},
};

#[derive(Debug, Clone, Error)]
pub enum TransactionError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("{0}")]
    VoucherError(#[from] VoucherError),
    #[error("Transaction with payment number {0} does not exist")]
    TransactionNotFound(PaymentNumber),
    #[error("The requested transaction (internal id {0}) does not exist")]
    TransactionIdNotFound(i64),
    #[error("The generated reference number {0} is already in use")]
    DuplicateReference(String),
    #[error("Payment type {0} is not allowed")]
    UnsupportedPaymentType(String),
    #[error("Amount cannot be charged: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    AmountOutOfRange(String),
    #[error("{0}")]
    GatewayError(#[from] GatewayError),
}

impl From<sqlx::Error> for TransactionError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref de) if de.is_unique_violation() => {
                TransactionError::DuplicateReference(de.message().to_string())
            },
            _ => TransactionError::DatabaseError(e.to_string()),
        }
    }
}

/// Transaction storage.
///
/// Implementations must be voucher stores too: a voucher is redeemed inside the same database transaction that
/// stores the order.
#[allow(async_fn_in_trait)]
pub trait TransactionManagement: VoucherManagement {
    /// Takes a new transaction, and in a single atomic unit,
    /// * stores the transaction,
    /// * if `voucher_id` is set, increments the voucher's redemption count, provided the count is still below the
    ///   voucher's cap, and
    /// * appends a usage log entry linking the voucher and the new transaction.
    ///
    /// If the voucher has been exhausted in the meantime, nothing is stored and
    /// [`VoucherError::VoucherUsageLimitExceeded`] is returned.
    /// Order and payment numbers must be unique. A clash results in [`TransactionError::DuplicateReference`].
    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, TransactionError>;

    async fn fetch_transaction_by_payment_number(
        &self,
        payment_number: &PaymentNumber,
    ) -> Result<Option<Transaction>, TransactionError>;

    /// Sets the status and the gateway's raw fraud status on the transaction with the given internal id. Returns
    /// the updated record.
    async fn update_payment_status(
        &self,
        id: i64,
        status: TransactionStatus,
        fraud_status: Option<String>,
    ) -> Result<Transaction, TransactionError>;
}
