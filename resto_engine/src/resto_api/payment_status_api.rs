use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{PaymentNumber, Transaction},
    resto_api::payment_objects::{PaymentNotification, PaymentStatusReport},
    traits::{TransactionError, TransactionManagement},
};

/// `PaymentStatusApi` reconciles gateway notifications with stored transactions, and reports payment status.
pub struct PaymentStatusApi<B> {
    db: B,
}

impl<B> Debug for PaymentStatusApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentStatusApi")
    }
}

impl<B> PaymentStatusApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> PaymentStatusApi<B>
where B: TransactionManagement
{
    /// Applies a gateway notification to the matching transaction and returns the updated record.
    ///
    /// The gateway's raw fraud status is stored alongside the mapped status.
    pub async fn process_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<Transaction, TransactionError> {
        let transaction = self.fetch(&notification.order_id).await?;
        let status = notification.reconciled_status();
        let updated = self.db.update_payment_status(transaction.id, status, notification.fraud_status).await?;
        info!(
            "💳️ Transaction {} status updated from {} to {} (gateway said {})",
            updated.id, transaction.status, updated.status, notification.transaction_status
        );
        Ok(updated)
    }

    pub async fn payment_status(&self, payment_number: &PaymentNumber) -> Result<PaymentStatusReport, TransactionError> {
        let transaction = self.fetch(payment_number).await?;
        Ok(PaymentStatusReport::from(transaction))
    }

    async fn fetch(&self, payment_number: &PaymentNumber) -> Result<Transaction, TransactionError> {
        self.db
            .fetch_transaction_by_payment_number(payment_number)
            .await?
            .ok_or_else(|| TransactionError::TransactionNotFound(payment_number.clone()))
    }
}
