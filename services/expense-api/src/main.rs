//! Expense API server binary

use actix_web::{middleware, web, App, HttpServer};
use expense_api::handlers::{self, AppState};
use expense_api::metrics::Metrics;
use expense_ledger::{
    Config, ExpenseLedger, Gateway, LedgerStore, MemoryStore, RocksDbStore, StoreBackend,
};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .json()
        .init();

    info!("Starting Expense API...");

    let config = match std::env::var("EXPENSE_CONFIG") {
        Ok(path) => Config::from_file(path),
        Err(_) => Config::from_env(),
    }
    .expect("Failed to load configuration");

    info!(policy = ?config.policy, backend = ?config.store_backend, "Configuration loaded");

    let store: Arc<dyn LedgerStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Rocksdb => {
            Arc::new(RocksDbStore::open(&config).expect("Failed to open expense store"))
        }
    };

    let gateway = Gateway::new(ExpenseLedger::new(store, config.policy.clone()));
    let metrics = Metrics::new().expect("Failed to create metrics");
    let state = web::Data::new(AppState { gateway, metrics });

    info!("Starting HTTP server on {}", config.listen_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .bind(config.listen_addr.as_str())?
    .run()
    .await
}
