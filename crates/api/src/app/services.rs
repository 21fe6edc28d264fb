use std::sync::Arc;

use kitshelf_infra::{InMemoryProductStore, ProductService, ProductStore, SqliteProductStore, StoreError};

/// Product service over whichever store the configuration selected.
pub type AppProductService = ProductService<Arc<dyn ProductStore>>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub products: AppProductService,
}

/// Wire the product store selected by `use_persistent_stores`.
///
/// The SQLite store creates the database file and table on first start.
pub async fn build_services(config: &crate::config::AppConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn ProductStore> = if config.use_persistent_stores {
        let store = SqliteProductStore::connect(&config.database_url).await?;
        store.migrate().await?;
        tracing::info!(database_url = %config.database_url, "using sqlite product store");
        Arc::new(store)
    } else {
        tracing::info!("using in-memory product store");
        Arc::new(InMemoryProductStore::new())
    };

    Ok(AppServices {
        products: ProductService::new(store),
    })
}
