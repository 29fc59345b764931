pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod resources;
pub mod store;
pub mod validation;

use std::sync::Arc;

use config::{StoreBackend, StoreConfig};
use resources::{Resource, Todo, User};
use store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};

/// Builds the store handle once; callers pass it to every controller.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let collections = [Todo::COLLECTION, User::COLLECTION];
            Ok(Arc::new(PgDocumentStore::connect(config, &collections).await?))
        }
    }
}

/// `RUST_LOG`-driven subscriber, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
