use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{NewVoucher, Voucher, VoucherUsageLog};

pub async fn fetch_voucher_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Voucher>, sqlx::Error> {
    let voucher = sqlx::query_as("SELECT * FROM vouchers WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(voucher)
}

pub async fn fetch_voucher_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Voucher>, sqlx::Error> {
    let voucher = sqlx::query_as("SELECT * FROM vouchers WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(voucher)
}

/// Fetches vouchers whose name contains `search`, ignoring case, oldest first. All vouchers are returned if `search`
/// is `None`.
pub async fn search_vouchers(search: Option<String>, conn: &mut SqliteConnection) -> Result<Vec<Voucher>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM vouchers ");
    if let Some(term) = search {
        let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        // LIKE is case-insensitive for ASCII in SQLite
        builder.push("WHERE name LIKE ");
        builder.push_bind(format!("%{escaped}%"));
        builder.push(" ESCAPE '\\' ");
    }
    builder.push("ORDER BY created_at ASC, id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let vouchers = builder.build_query_as::<Voucher>().fetch_all(conn).await?;
    Ok(vouchers)
}

pub async fn count_vouchers(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vouchers").fetch_one(conn).await?;
    Ok(count.0)
}

pub async fn insert_voucher(
    voucher: NewVoucher,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Voucher, sqlx::Error> {
    let voucher = sqlx::query_as(
        r#"
            INSERT INTO vouchers (name, voucher_type, discount, amount, max_amount, expired_at, created_at, updated_at)
            VALUES ($1, $2, $3, 0, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(voucher.name)
    .bind(voucher.voucher_type)
    .bind(voucher.discount)
    .bind(voucher.max_amount)
    .bind(voucher.expired_at)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(voucher)
}

pub async fn update_voucher(
    id: i64,
    voucher: NewVoucher,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Voucher>, sqlx::Error> {
    let voucher = sqlx::query_as(
        r#"
            UPDATE vouchers SET
                name = $1,
                voucher_type = $2,
                discount = $3,
                max_amount = $4,
                expired_at = $5,
                updated_at = $6
            WHERE id = $7
            RETURNING *;
        "#,
    )
    .bind(voucher.name)
    .bind(voucher.voucher_type)
    .bind(voucher.discount)
    .bind(voucher.max_amount)
    .bind(voucher.expired_at)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(voucher)
}

/// Deletes the voucher. Its usage log goes with it, and transactions that used it lose their reference.
pub async fn delete_voucher(id: i64, conn: &mut SqliteConnection) -> Result<Option<Voucher>, sqlx::Error> {
    let voucher =
        sqlx::query_as("DELETE FROM vouchers WHERE id = $1 RETURNING *").bind(id).fetch_optional(conn).await?;
    Ok(voucher)
}

/// Increments the redemption count of the voucher, but only while it is below the cap. Returns `None` if the voucher
/// does not exist or is already exhausted.
///
/// The check and the increment are a single statement, so concurrent redemptions can never push `amount` past
/// `max_amount`.
pub async fn redeem_voucher(
    id: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Voucher>, sqlx::Error> {
    let voucher: Option<Voucher> = sqlx::query_as(
        "UPDATE vouchers SET amount = amount + 1, updated_at = $1 WHERE id = $2 AND amount < max_amount RETURNING *",
    )
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    if let Some(v) = &voucher {
        debug!("🗃️ Voucher {} redeemed. {} of {} used", v.name, v.amount, v.max_amount);
    }
    Ok(voucher)
}

pub async fn insert_usage_log(
    voucher_id: i64,
    transaction_id: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<VoucherUsageLog, sqlx::Error> {
    let log = sqlx::query_as(
        "INSERT INTO voucher_usage_logs (voucher_id, transaction_id, created_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(voucher_id)
    .bind(transaction_id)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(log)
}

pub async fn fetch_latest_usage_log(
    voucher_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<VoucherUsageLog>, sqlx::Error> {
    let log = sqlx::query_as(
        "SELECT * FROM voucher_usage_logs WHERE voucher_id = $1 ORDER BY datetime(created_at) DESC, id DESC LIMIT 1",
    )
    .bind(voucher_id)
    .fetch_optional(conn)
    .await?;
    Ok(log)
}

/// Counts usage log entries in `[since, until)`. Timestamps are normalised with `datetime()` so that the comparison
/// does not depend on how they were formatted when stored.
pub async fn count_usage_logs_between(
    since: DateTime<Utc>,
    until: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as(
        r#"
            SELECT COUNT(*) FROM voucher_usage_logs
            WHERE datetime(created_at) >= datetime($1) AND datetime(created_at) < datetime($2)
        "#,
    )
    .bind(since)
    .bind(until)
    .fetch_one(conn)
    .await?;
    Ok(count.0)
}
