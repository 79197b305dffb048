use std::path::Path;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::SqliteDatabase;

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/resto_test_store_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// Forces the redemption count of a voucher, e.g. to put it one use short of its cap.
pub async fn set_voucher_redemptions(db: &SqliteDatabase, voucher_id: i64, amount: i64) {
    sqlx::query("UPDATE vouchers SET amount = $1 WHERE id = $2")
        .bind(amount)
        .bind(voucher_id)
        .execute(db.pool())
        .await
        .expect("Error updating voucher amount");
}

/// Moves every usage log entry of the voucher to the given timestamp.
pub async fn backdate_usage_logs(db: &SqliteDatabase, voucher_id: i64, when: DateTime<Utc>) {
    sqlx::query("UPDATE voucher_usage_logs SET created_at = $1 WHERE voucher_id = $2")
        .bind(when)
        .bind(voucher_id)
        .execute(db.pool())
        .await
        .expect("Error backdating usage logs");
}
