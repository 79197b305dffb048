//! Helpers for tests that run against a real SQLite database. Enabled with the `test_utils` feature.
mod prepare_env;

pub use prepare_env::{
    backdate_usage_logs,
    create_database,
    prepare_test_env,
    random_db_path,
    run_migrations,
    set_voucher_redemptions,
};
