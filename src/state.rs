use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::observability::metrics::Metrics;
use crate::store::OrderStore;

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: OrderStore,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(catalog: Catalog, store: OrderStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            metrics: Metrics::new(),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let store = OrderStore::connect(database_url, max_connections).await?;
        Ok(Self::new(Catalog::cafe(), store))
    }
}
