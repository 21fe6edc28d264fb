use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use kitshelf_core::ProductId;
use kitshelf_products::{NewProduct, ProductPatch, ProductRecord};

use super::r#trait::{ProductStore, StoreError};

#[derive(Debug, Default)]
struct Rows {
    by_id: BTreeMap<ProductId, ProductRecord>,
    last_id: i64,
}

/// In-memory product store.
///
/// Intended for tests/dev. Ids are assigned monotonically and never reused.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Rows>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn load(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn load_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        rows.last_id += 1;
        let now = Utc::now();
        let record = ProductRecord {
            id: ProductId::new(rows.last_id),
            name: product.name,
            brand: product.brand,
            size: product.size,
            color: product.color,
            availability: product.availability,
            created_at: now,
            updated_at: now,
        };
        rows.by_id.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let Some(record) = rows.by_id.get_mut(&id) else {
            return Ok(0);
        };

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(brand) = patch.brand {
            record.brand = brand;
        }
        if let Some(size) = patch.size {
            record.size = size;
        }
        if let Some(color) = patch.color {
            record.color = color;
        }
        if let Some(availability) = patch.availability {
            record.availability = availability;
        }
        record.updated_at = Utc::now();

        Ok(1)
    }

    async fn delete(&self, id: ProductId) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.by_id.remove(&id).map_or(0, |_| 1))
    }
}
