use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{NewTransaction, PaymentMethod, Transaction, TransactionStatus},
    helpers::{generate_order_number, generate_payment_number},
    resto_api::{
        pricing::{calculate_price, Discount, PriceBreakdown},
        transaction_objects::TransactionRequest,
        voucher_api::check_voucher_eligibility,
    },
    traits::{TransactionError, TransactionManagement},
};

/// How many times a transaction insert is attempted when the generated reference numbers clash with existing ones.
const MAX_INSERT_ATTEMPTS: usize = 3;

/// `TransactionFlowApi` records new point-of-sale transactions: it validates the voucher, prices the cart, decides
/// the initial status and stores everything atomically.
pub struct TransactionFlowApi<B> {
    db: B,
    trust_client_status: bool,
}

impl<B> Debug for TransactionFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionFlowApi (trust_client_status: {})", self.trust_client_status)
    }
}

impl<B> TransactionFlowApi<B> {
    /// Creates a new API instance that trusts the client-declared status of non-cash transactions.
    pub fn new(db: B) -> Self {
        Self { db, trust_client_status: true }
    }

    /// When `false`, non-cash transactions always start out as `pending`, whatever the client says.
    pub fn with_client_status_trust(mut self, trust: bool) -> Self {
        self.trust_client_status = trust;
        self
    }

    /// The initial status of a new transaction.
    ///
    /// * A voucher that brings the total down to zero completes the transaction.
    /// * Cash is paid at the till, so cash transactions are always complete.
    /// * Otherwise, the client-declared status is used if it is trusted, and `pending` if not.
    pub fn initial_status(
        &self,
        method: &PaymentMethod,
        declared: Option<TransactionStatus>,
        voucher_used: bool,
        price: &PriceBreakdown,
    ) -> TransactionStatus {
        if (voucher_used && price.total.is_zero()) || *method == PaymentMethod::Cash {
            TransactionStatus::Completed
        } else if self.trust_client_status {
            declared.unwrap_or_default()
        } else {
            TransactionStatus::Pending
        }
    }
}

impl<B> TransactionFlowApi<B>
where B: TransactionManagement
{
    /// Records a new transaction.
    ///
    /// If a voucher code is given, it must pass the eligibility check, otherwise nothing is stored. The voucher is
    /// redeemed in the same atomic unit as the transaction insert, so two concurrent requests cannot push a voucher
    /// past its cap.
    pub async fn create_transaction(
        &self,
        request: TransactionRequest,
        now: DateTime<Utc>,
    ) -> Result<Transaction, TransactionError> {
        let voucher = match request.voucher_code() {
            Some(code) => Some(check_voucher_eligibility(&self.db, code, now).await?),
            None => None,
        };
        let discount = voucher.as_ref().map(Discount::from);
        let price = calculate_price(&request.cart, &request.payment_method, discount.as_ref())?;
        let status = self.initial_status(&request.payment_method, request.status, voucher.is_some(), &price);
        debug!(
            "🧾️ Priced transaction for {}: subtotal {}, discount {}, service charge {}, rounding {}, total {}. Status {}",
            request.customer_name,
            price.sub_total,
            price.discount,
            price.service_charge,
            price.rounding,
            price.total,
            status
        );
        let mut attempt = 0;
        loop {
            attempt += 1;
            let new_transaction = NewTransaction {
                number: generate_order_number(now),
                payment_number: generate_payment_number(now),
                transaction_type: request.transaction_type,
                payment_method: request.payment_method.clone(),
                customer_name: request.customer_name.clone(),
                additional_note: request.additional_note.clone(),
                sub_total: price.sub_total,
                discount: price.discount,
                service_charge: price.service_charge,
                rounding: price.rounding,
                total: price.total,
                status,
                voucher_id: voucher.as_ref().map(|v| v.id),
                created_at: now,
            };
            match self.db.insert_transaction(new_transaction).await {
                Ok(transaction) => {
                    info!(
                        "🧾️ Transaction {} ({}) created for {}. Total {}",
                        transaction.number, transaction.payment_number, transaction.customer_name, transaction.total
                    );
                    return Ok(transaction);
                },
                Err(TransactionError::DuplicateReference(msg)) if attempt < MAX_INSERT_ATTEMPTS => {
                    warn!("🧾️ Reference number clash ({msg}). Retrying with fresh numbers. Attempt {attempt}");
                },
                Err(e) => return Err(e),
            }
        }
    }
}
