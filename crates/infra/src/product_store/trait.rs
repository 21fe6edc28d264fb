use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use kitshelf_core::ProductId;
use kitshelf_products::{NewProduct, ProductPatch, ProductRecord};

/// Product store operation error.
///
/// These are **infrastructure errors** (connection, query, row decoding) as
/// opposed to domain errors (validation, malformed availability).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A row came back in a shape the store cannot map to a record.
    #[error("failed to decode stored row: {0}")]
    Decode(String),
}

/// Product persistence.
///
/// Each call acquires whatever connection it needs and releases it before
/// returning; no connection is held between calls. Implementations provide no
/// compare-and-swap: a load followed by an update is not atomic.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Load one product, `None` if absent.
    async fn load(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError>;

    /// Load every product, ordered by id.
    async fn load_all(&self) -> Result<Vec<ProductRecord>, StoreError>;

    /// Insert a product; the store assigns the id and timestamps.
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError>;

    /// Apply a partial update and return the number of affected rows.
    ///
    /// An empty patch affects zero rows.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<u64, StoreError>;

    /// Delete a product and return the number of affected rows.
    async fn delete(&self, id: ProductId) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn load(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        (**self).load(id).await
    }

    async fn load_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        (**self).load_all().await
    }

    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError> {
        (**self).create(product).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<u64, StoreError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ProductId) -> Result<u64, StoreError> {
        (**self).delete(id).await
    }
}
