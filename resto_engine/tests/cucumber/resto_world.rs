use cucumber::World;
use log::*;
use resto_engine::{
    db_types::Transaction,
    test_utils::{create_database, random_db_path, run_migrations},
    PaymentStatusApi,
    SqliteDatabase,
    TransactionError,
    TransactionFlowApi,
    VoucherApi,
};

#[derive(Default, Debug, World)]
pub struct RestoWorld {
    pub system: Option<RestaurantSystem>,
    pub last_transaction: Option<Transaction>,
    pub last_error: Option<TransactionError>,
}

#[derive(Debug)]
pub struct RestaurantSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub transactions: TransactionFlowApi<SqliteDatabase>,
    pub vouchers: VoucherApi<SqliteDatabase>,
    pub payments: PaymentStatusApi<SqliteDatabase>,
}

impl RestoWorld {
    pub fn system(&self) -> &RestaurantSystem {
        self.system.as_ref().expect("System not initialised. Did you forget 'Given a fresh install'?")
    }

    pub fn last_transaction(&self) -> &Transaction {
        match (&self.last_transaction, &self.last_error) {
            (Some(tx), _) => tx,
            (None, Some(e)) => panic!("The last transaction failed: {e}"),
            (None, None) => panic!("No transaction has been created yet"),
        }
    }
}

impl RestaurantSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        Self {
            db_path: url,
            transactions: TransactionFlowApi::new(db.clone()),
            vouchers: VoucherApi::new(db.clone()),
            payments: PaymentStatusApi::new(db.clone()),
            db,
        }
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
