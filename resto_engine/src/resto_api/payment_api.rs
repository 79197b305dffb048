use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Rupiah, Transaction},
    resto_api::payment_objects::{ChargeTransactionRequest, QRIS_PAYMENT_TYPE},
    traits::{ChargeLine, ChargeOrder, ChargeReceipt, PaymentGateway, TransactionError, TransactionManagement},
};

/// `PaymentApi` charges stored transactions through an external payment gateway.
pub struct PaymentApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for PaymentApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentApi")
    }
}

impl<B, G> PaymentApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }
}

fn whole(amount: Rupiah, what: &str) -> Result<i64, TransactionError> {
    amount.to_whole_units().map_err(|e| TransactionError::InvalidAmount(format!("{what}. {e}")))
}

/// Builds the gateway charge for a stored transaction.
///
/// The charge has four lines: the order itself (priced at its subtotal), the service charge, the discount (as a
/// negative amount) and the rounding adjustment. These add up to the stored total. Amounts must be whole rupiah.
pub fn build_charge_order(transaction: &Transaction, payment_type: &str) -> Result<ChargeOrder, TransactionError> {
    let lines = vec![
        ChargeLine {
            id: transaction.id.to_string(),
            name: transaction.customer_name.clone(),
            price: whole(transaction.sub_total, "Subtotal")?,
        },
        ChargeLine {
            id: "service_charge".to_string(),
            name: "Service Charge".to_string(),
            price: whole(transaction.service_charge, "Service charge")?,
        },
        ChargeLine {
            id: "discount".to_string(),
            name: "Discount".to_string(),
            price: -whole(transaction.discount, "Discount")?,
        },
        ChargeLine {
            id: "rounding".to_string(),
            name: "Rounding".to_string(),
            price: whole(transaction.rounding, "Rounding")?,
        },
    ];
    let order = ChargeOrder {
        payment_type: payment_type.to_string(),
        order_id: transaction.payment_number.to_string(),
        customer_name: transaction.customer_name.clone(),
        lines,
    };
    let total = whole(transaction.total, "Total")?;
    if order.gross_amount() != total {
        return Err(TransactionError::InvalidAmount(format!(
            "Charge lines add up to {} but the transaction total is {total}",
            order.gross_amount()
        )));
    }
    Ok(order)
}

impl<B, G> PaymentApi<B, G>
where
    B: TransactionManagement,
    G: PaymentGateway,
{
    /// Charges the transaction identified by the request's order id (its payment number).
    ///
    /// Only QRIS charges are accepted, and this is checked before anything else. The gateway is called exactly once;
    /// a rejection is passed back with the gateway's own status code and message.
    pub async fn charge(&self, request: ChargeTransactionRequest) -> Result<ChargeReceipt, TransactionError> {
        if request.payment_type != QRIS_PAYMENT_TYPE {
            warn!("💳️ Refusing {} charge for {}", request.payment_type, request.transaction_details.order_id);
            return Err(TransactionError::UnsupportedPaymentType(request.payment_type));
        }
        let payment_number = request.transaction_details.order_id;
        let transaction = self
            .db
            .fetch_transaction_by_payment_number(&payment_number)
            .await?
            .ok_or_else(|| TransactionError::TransactionNotFound(payment_number.clone()))?;
        let order = build_charge_order(&transaction, &request.payment_type)?;
        debug!("💳️ Charging {} for transaction {}", order.gross_amount(), transaction.number);
        let receipt = self.gateway.submit_charge(order).await?;
        info!("💳️ Charge for {payment_number} accepted. {}", receipt.status_message);
        Ok(receipt)
    }
}
