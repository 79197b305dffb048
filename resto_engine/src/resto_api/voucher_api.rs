use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewVoucher, Voucher},
    traits::{VoucherError, VoucherManagement},
};

/// Today's voucher activity. `total` counts all vouchers on record, `used` counts redemptions in the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherUsageSummary {
    pub total: i64,
    pub used: i64,
}

/// Checks whether the voucher named `code` can be redeemed at `now`.
///
/// The checks run in order: existence, single daily use for complimentary (100%) vouchers, the redemption cap, and
/// finally expiry. This is a read-only check; the redemption itself happens when the transaction is stored.
///
/// The daily-use check looks for *any* usage log entry for the voucher, not just today's. A complimentary voucher
/// that was used once, on any day, is rejected from then on.
pub async fn check_voucher_eligibility<B: VoucherManagement>(
    db: &B,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Voucher, VoucherError> {
    let voucher =
        db.fetch_voucher_by_name(code).await?.ok_or_else(|| VoucherError::VoucherNotFound(code.to_string()))?;
    if voucher.is_complimentary() {
        if let Some(log) = db.fetch_latest_usage_log(voucher.id).await? {
            debug!("🎟️ Complimentary voucher {code} was last used at {}", log.created_at);
            return Err(VoucherError::VoucherAlreadyUsedToday(voucher.name));
        }
    }
    if voucher.is_exhausted() {
        debug!("🎟️ Voucher {code} has been redeemed {} of {} times", voucher.amount, voucher.max_amount);
        return Err(VoucherError::VoucherUsageLimitExceeded(voucher.name));
    }
    if voucher.is_expired_at(now) {
        debug!("🎟️ Voucher {code} expired at {}", voucher.expired_at);
        return Err(VoucherError::VoucherExpired(voucher.name));
    }
    Ok(voucher)
}

/// `VoucherApi` manages the voucher catalogue and answers eligibility queries.
pub struct VoucherApi<B> {
    db: B,
}

impl<B> Debug for VoucherApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VoucherApi")
    }
}

impl<B> VoucherApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> VoucherApi<B>
where B: VoucherManagement
{
    pub async fn search(&self, search: Option<String>) -> Result<Vec<Voucher>, VoucherError> {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.db.search_vouchers(search).await
    }

    /// Summarises voucher usage between `day_start` (inclusive) and `day_end` (exclusive). Callers decide what "today"
    /// means, typically midnight to midnight in the server's local time zone.
    pub async fn usage_summary(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<VoucherUsageSummary, VoucherError> {
        let total = self.db.count_vouchers().await?;
        let used = self.db.count_usage_logs_between(day_start, day_end).await?;
        Ok(VoucherUsageSummary { total, used })
    }

    pub async fn voucher_by_code(&self, code: &str) -> Result<Voucher, VoucherError> {
        self.db.fetch_voucher_by_name(code).await?.ok_or_else(|| VoucherError::VoucherNotFound(code.to_string()))
    }

    pub async fn create_voucher(&self, voucher: NewVoucher) -> Result<Voucher, VoucherError> {
        let voucher = self.db.insert_voucher(voucher).await?;
        info!("🎟️ Voucher {} (#{}) created", voucher.name, voucher.id);
        Ok(voucher)
    }

    pub async fn update_voucher(&self, id: i64, voucher: NewVoucher) -> Result<Voucher, VoucherError> {
        let voucher = self.db.update_voucher(id, voucher).await?;
        info!("🎟️ Voucher {} (#{}) updated", voucher.name, voucher.id);
        Ok(voucher)
    }

    pub async fn delete_voucher(&self, id: i64) -> Result<Voucher, VoucherError> {
        let voucher = self.db.delete_voucher(id).await?;
        info!("🎟️ Voucher {} (#{}) deleted", voucher.name, voucher.id);
        Ok(voucher)
    }
}
