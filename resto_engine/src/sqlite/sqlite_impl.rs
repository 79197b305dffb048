//! `SqliteDatabase` is a concrete implementation of a restaurant engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{db_url, new_pool, transactions, vouchers};
use crate::{
    db_types::{NewTransaction, NewVoucher, PaymentNumber, Transaction, TransactionStatus, Voucher, VoucherUsageLog},
    traits::{TransactionError, TransactionManagement, VoucherError, VoucherManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `RESTO_DATABASE_URL`, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        trace!("🗃️ Created new SQLite pool for {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

fn unique_name_error(e: sqlx::Error, name: &str) -> VoucherError {
    match e {
        sqlx::Error::Database(ref de) if de.is_unique_violation() => VoucherError::VoucherAlreadyExists(name.to_string()),
        e => VoucherError::from(e),
    }
}

impl VoucherManagement for SqliteDatabase {
    async fn fetch_voucher_by_name(&self, name: &str) -> Result<Option<Voucher>, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let voucher = vouchers::fetch_voucher_by_name(name, &mut conn).await?;
        Ok(voucher)
    }

    async fn fetch_voucher_by_id(&self, id: i64) -> Result<Option<Voucher>, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let voucher = vouchers::fetch_voucher_by_id(id, &mut conn).await?;
        Ok(voucher)
    }

    async fn fetch_latest_usage_log(&self, voucher_id: i64) -> Result<Option<VoucherUsageLog>, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let log = vouchers::fetch_latest_usage_log(voucher_id, &mut conn).await?;
        Ok(log)
    }

    async fn search_vouchers(&self, search: Option<String>) -> Result<Vec<Voucher>, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let vouchers = vouchers::search_vouchers(search, &mut conn).await?;
        Ok(vouchers)
    }

    async fn count_vouchers(&self) -> Result<i64, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let count = vouchers::count_vouchers(&mut conn).await?;
        Ok(count)
    }

    async fn count_usage_logs_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<i64, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let count = vouchers::count_usage_logs_between(since, until, &mut conn).await?;
        Ok(count)
    }

    async fn insert_voucher(&self, voucher: NewVoucher) -> Result<Voucher, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let name = voucher.name.clone();
        let voucher =
            vouchers::insert_voucher(voucher, Utc::now(), &mut conn).await.map_err(|e| unique_name_error(e, &name))?;
        debug!("🗃️ Voucher {} saved with id {}", voucher.name, voucher.id);
        Ok(voucher)
    }

    async fn update_voucher(&self, id: i64, voucher: NewVoucher) -> Result<Voucher, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        let name = voucher.name.clone();
        vouchers::update_voucher(id, voucher, Utc::now(), &mut conn)
            .await
            .map_err(|e| unique_name_error(e, &name))?
            .ok_or(VoucherError::VoucherIdNotFound(id))
    }

    async fn delete_voucher(&self, id: i64) -> Result<Voucher, VoucherError> {
        let mut conn = self.pool.acquire().await?;
        vouchers::delete_voucher(id, &mut conn).await?.ok_or(VoucherError::VoucherIdNotFound(id))
    }
}

impl TransactionManagement for SqliteDatabase {
    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, TransactionError> {
        let mut tx = self.pool.begin().await?;
        let stored = transactions::insert_transaction(&transaction, &mut tx).await?;
        if let Some(voucher_id) = transaction.voucher_id {
            // Dropping `tx` without committing rolls the insert back
            if vouchers::redeem_voucher(voucher_id, transaction.created_at, &mut tx).await?.is_none() {
                let err = match vouchers::fetch_voucher_by_id(voucher_id, &mut tx).await? {
                    Some(v) => VoucherError::VoucherUsageLimitExceeded(v.name),
                    None => VoucherError::VoucherIdNotFound(voucher_id),
                };
                warn!("🗃️ Voucher #{voucher_id} could not be redeemed for {}. {err}", stored.number);
                return Err(err.into());
            }
            vouchers::insert_usage_log(voucher_id, stored.id, transaction.created_at, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ Transaction {} saved with id {}", stored.number, stored.id);
        Ok(stored)
    }

    async fn fetch_transaction_by_payment_number(
        &self,
        payment_number: &PaymentNumber,
    ) -> Result<Option<Transaction>, TransactionError> {
        let mut conn = self.pool.acquire().await?;
        let transaction = transactions::fetch_transaction_by_payment_number(payment_number, &mut conn).await?;
        Ok(transaction)
    }

    async fn update_payment_status(
        &self,
        id: i64,
        status: TransactionStatus,
        fraud_status: Option<String>,
    ) -> Result<Transaction, TransactionError> {
        let mut conn = self.pool.acquire().await?;
        transactions::update_payment_status(id, status, fraud_status, Utc::now(), &mut conn)
            .await?
            .ok_or(TransactionError::TransactionIdNotFound(id))
    }
}
