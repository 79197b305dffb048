use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{NewVoucher, Voucher, VoucherUsageLog};

#[derive(Debug, Clone, Error)]
pub enum VoucherError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Voucher {0} does not exist")]
    VoucherNotFound(String),
    #[error("The requested voucher (internal id {0}) does not exist")]
    VoucherIdNotFound(i64),
    #[error("Voucher {0} is a single-use voucher that has already been used")]
    VoucherAlreadyUsedToday(String),
    #[error("Voucher {0} has reached its usage limit")]
    VoucherUsageLimitExceeded(String),
    #[error("Voucher {0} has expired")]
    VoucherExpired(String),
    #[error("A voucher named {0} already exists")]
    VoucherAlreadyExists(String),
}

impl From<sqlx::Error> for VoucherError {
    fn from(e: sqlx::Error) -> Self {
        VoucherError::DatabaseError(e.to_string())
    }
}

/// Voucher storage.
#[allow(async_fn_in_trait)]
pub trait VoucherManagement {
    /// Fetches the voucher whose name (its redemption code) matches `name` exactly.
    async fn fetch_voucher_by_name(&self, name: &str) -> Result<Option<Voucher>, VoucherError>;

    async fn fetch_voucher_by_id(&self, id: i64) -> Result<Option<Voucher>, VoucherError>;

    /// Returns the most recent usage log entry for the voucher, regardless of when it was created.
    async fn fetch_latest_usage_log(&self, voucher_id: i64) -> Result<Option<VoucherUsageLog>, VoucherError>;

    /// Fetches all vouchers, oldest first. If `search` is given, only vouchers whose name contains the search term
    /// (ignoring case) are returned.
    async fn search_vouchers(&self, search: Option<String>) -> Result<Vec<Voucher>, VoucherError>;

    async fn count_vouchers(&self) -> Result<i64, VoucherError>;

    /// Counts the usage log entries created in the half-open interval `[since, until)`.
    async fn count_usage_logs_between(&self, since: DateTime<Utc>, until: DateTime<Utc>)
        -> Result<i64, VoucherError>;

    /// Stores a new voucher with a redemption count of zero. Voucher names are unique, and a duplicate name results
    /// in [`VoucherError::VoucherAlreadyExists`].
    async fn insert_voucher(&self, voucher: NewVoucher) -> Result<Voucher, VoucherError>;

    /// Overwrites the editable fields of the voucher with the given id. The redemption count is left untouched.
    async fn update_voucher(&self, id: i64, voucher: NewVoucher) -> Result<Voucher, VoucherError>;

    /// Removes the voucher and its usage log, returning the deleted record.
    async fn delete_voucher(&self, id: i64) -> Result<Voucher, VoucherError>;
}
