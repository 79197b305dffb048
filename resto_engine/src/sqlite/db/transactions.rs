use chrono::{DateTime, Utc};
use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewTransaction, PaymentNumber, Transaction, TransactionStatus};

/// Inserts a new transaction using the given connection. This is not atomic. Embed this call inside a transaction
/// if the insert must happen together with a voucher redemption, and pass `&mut tx` as the connection argument.
pub async fn insert_transaction(
    transaction: &NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Transaction, sqlx::Error> {
    let transaction = sqlx::query_as(
        r#"
            INSERT INTO transactions (
                number,
                payment_number,
                transaction_type,
                payment_method,
                customer_name,
                additional_note,
                sub_total,
                discount,
                service_charge,
                rounding,
                total,
                status,
                voucher_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING *;
        "#,
    )
    .bind(&transaction.number)
    .bind(&transaction.payment_number)
    .bind(transaction.transaction_type)
    .bind(transaction.payment_method.to_string())
    .bind(&transaction.customer_name)
    .bind(&transaction.additional_note)
    .bind(transaction.sub_total)
    .bind(transaction.discount)
    .bind(transaction.service_charge)
    .bind(transaction.rounding)
    .bind(transaction.total)
    .bind(transaction.status)
    .bind(transaction.voucher_id)
    .bind(transaction.created_at)
    .fetch_one(conn)
    .await?;
    Ok(transaction)
}

pub async fn fetch_transaction_by_payment_number(
    payment_number: &PaymentNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let transaction = sqlx::query_as("SELECT * FROM transactions WHERE payment_number = $1")
        .bind(payment_number.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(transaction)
}

/// Sets the payment status and fraud status of the transaction with the given internal id. Returns `None` if there is
/// no such transaction.
pub async fn update_payment_status(
    id: i64,
    status: TransactionStatus,
    fraud_status: Option<String>,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    trace!("🗃️ Setting status of transaction #{id} to {status}");
    let transaction = sqlx::query_as(
        "UPDATE transactions SET status = $1, fraud_status = $2, updated_at = $3 WHERE id = $4 RETURNING *",
    )
    .bind(status)
    .bind(fraud_status)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(transaction)
}
