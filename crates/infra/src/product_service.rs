//! Product catalog and availability orchestration.
//!
//! Every operation follows the same shape:
//!
//! ```text
//! load record from store (absent -> NotFound)
//!   -> decode stored availability text
//!   -> query or mutate the decoded set
//!   -> (mutations) encode and write back through the store
//!   -> project for the caller
//! ```
//!
//! The read-modify-write is **not** atomic. Two concurrent `add_availability`
//! calls on the same product each load, append and write; the last write wins
//! and the other window is lost. The store offers no compare-and-swap and this
//! layer takes no lock.
//!
//! All failures come back as [`ServiceError`] with a reason string; nothing
//! here panics or propagates an unclassified fault.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use kitshelf_core::{DomainError, ProductId};
use kitshelf_products::{
    parse_epoch_millis, Brand, Color, Interval, IntervalProjection, NewProduct, ProductPatch,
    ProductRecord, Size,
};

use crate::product_store::ProductStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing or invalid input (caller's fault, not retried).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Persisted availability text is corrupt.
    #[error("malformed stored availability: {0}")]
    MalformedStore(String),

    /// A supplied timestamp or interval literal failed to parse.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("product creation failed: {0}")]
    CreateFailed(String),

    #[error("product update failed: {0}")]
    UpdateFailed(String),

    #[error("product delete failed: {0}")]
    DeleteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::Parse(msg) => ServiceError::Parse(msg),
            DomainError::MalformedStore(msg) => ServiceError::MalformedStore(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
        }
    }
}

/// Input for product creation.
///
/// `start`/`end` are raw epoch-millisecond strings as supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProduct {
    pub name: String,
    pub brand: Brand,
    pub size: Size,
    pub color: Color,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Input for a generic product update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub brand: Option<Brand>,
    pub size: Option<Size>,
    pub color: Option<Color>,
    /// Epoch milliseconds; appended as a new window when paired with `end`.
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Product with its availability decoded to the client-facing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub brand: Brand,
    pub size: Size,
    pub color: Color,
    pub availability: Vec<IntervalProjection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for ProductView {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let availability = record.availability_set()?.project_all();
        Ok(Self {
            id: record.id,
            name: record.name,
            brand: record.brand,
            size: record.size,
            color: record.color,
            availability,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Product operations over any [`ProductStore`].
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a product, seeding availability with one window when both
    /// `start` and `end` are supplied.
    ///
    /// An unparsable window downgrades to `CreateFailed` with the reason.
    pub async fn create(&self, cmd: CreateProduct) -> Result<ProductRecord, ServiceError> {
        let window = match (cmd.start.as_deref(), cmd.end.as_deref()) {
            (Some(start), Some(end)) => match parse_window(start, end) {
                Ok(interval) => Some(interval),
                Err(e) => {
                    tracing::warn!(error = %e, "rejecting product creation with invalid window");
                    return Err(ServiceError::CreateFailed(format!(
                        "invalid availability window: {e}"
                    )));
                }
            },
            (None, None) => None,
            _ => return Err(unpaired_window()),
        };

        let product = NewProduct::new(cmd.name, cmd.brand, cmd.size, cmd.color, window)?;

        let record = self
            .store
            .create(product)
            .await
            .map_err(|e| ServiceError::CreateFailed(e.to_string()))?;

        tracing::info!(product_id = %record.id, "product created");
        Ok(record)
    }

    pub async fn list_all(&self) -> Result<Vec<ProductView>, ServiceError> {
        let records = self
            .store
            .load_all()
            .await
            .map_err(|e| ServiceError::ReadFailed(e.to_string()))?;

        records
            .into_iter()
            .map(|record| ProductView::try_from(record).map_err(ServiceError::from))
            .collect()
    }

    pub async fn get_by_id(&self, id: ProductId) -> Result<ProductRecord, ServiceError> {
        self.load_existing(id, ServiceError::ReadFailed).await
    }

    /// Apply attribute changes and, when a `start`/`end` pair is supplied,
    /// append it to the stored availability. Everything lands in one store update.
    ///
    /// Anything other than exactly one affected row is `UpdateFailed`.
    pub async fn update_by_id(&self, id: ProductId, cmd: UpdateProduct) -> Result<(), ServiceError> {
        let record = self.load_existing(id, ServiceError::UpdateFailed).await?;

        let window = match (cmd.start, cmd.end) {
            (Some(start), Some(end)) => Some(Interval::from_epoch_pair(start, end)?),
            (None, None) => None,
            _ => return Err(unpaired_window()),
        };

        let mut patch = ProductPatch {
            name: cmd.name,
            brand: cmd.brand,
            size: cmd.size,
            color: cmd.color,
            availability: None,
        };
        patch.validate()?;

        if let Some(interval) = window {
            let mut set = record.availability_set()?;
            set.append(interval);
            patch.availability = Some(set.encode());
        }

        let affected = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| ServiceError::UpdateFailed(e.to_string()))?;

        if affected != 1 {
            return Err(ServiceError::UpdateFailed(format!(
                "product {id} not found or body is empty"
            )));
        }

        tracing::info!(product_id = %id, "product updated");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: ProductId) -> Result<(), ServiceError> {
        let affected = self
            .store
            .delete(id)
            .await
            .map_err(|e| ServiceError::DeleteFailed(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// All windows of a product, in insertion order (empty when none).
    pub async fn get_availabilities(&self, id: ProductId) -> Result<Vec<IntervalProjection>, ServiceError> {
        let record = self.load_existing(id, ServiceError::ReadFailed).await?;
        Ok(record.availability_set()?.project_all())
    }

    /// Append a window and return the full set after the write.
    pub async fn add_availability(
        &self,
        id: ProductId,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<IntervalProjection>, ServiceError> {
        let record = self.load_existing(id, ServiceError::WriteFailed).await?;
        let interval = Interval::from_epoch_pair(start_ms, end_ms)?;
        self.append_window(record, interval).await
    }

    /// [`Self::add_availability`] for raw epoch-millisecond strings as sent by clients.
    ///
    /// The product is loaded before the window is looked at, so a missing
    /// product is `NotFound` whatever the window holds.
    pub async fn add_availability_raw(
        &self,
        id: ProductId,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<IntervalProjection>, ServiceError> {
        let record = self.load_existing(id, ServiceError::WriteFailed).await?;
        let interval = match (start, end) {
            (Some(start), Some(end)) => parse_window(start, end)?,
            _ => return Err(unpaired_window()),
        };
        self.append_window(record, interval).await
    }

    /// Whether any window of the product contains `now`.
    pub async fn check_availability(&self, id: ProductId, now: DateTime<Utc>) -> Result<bool, ServiceError> {
        let record = self.load_existing(id, ServiceError::ReadFailed).await?;
        Ok(record.availability_set()?.contains_instant(now))
    }

    async fn append_window(
        &self,
        record: ProductRecord,
        interval: Interval,
    ) -> Result<Vec<IntervalProjection>, ServiceError> {
        let id = record.id;
        let mut set = record.availability_set()?;
        set.append(interval);

        let affected = self
            .store
            .update(id, ProductPatch::availability(&set))
            .await
            .map_err(|e| ServiceError::WriteFailed(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::WriteFailed(format!(
                "no rows affected while writing availability of product {id}"
            )));
        }

        tracing::info!(product_id = %id, windows = set.len(), "availability window added");
        Ok(set.project_all())
    }

    async fn load_existing(
        &self,
        id: ProductId,
        on_store_error: fn(String) -> ServiceError,
    ) -> Result<ProductRecord, ServiceError> {
        match self.store.load(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ServiceError::NotFound(id)),
            Err(e) => Err(on_store_error(e.to_string())),
        }
    }
}

fn parse_window(start: &str, end: &str) -> Result<Interval, DomainError> {
    Interval::from_epoch_pair(parse_epoch_millis(start)?, parse_epoch_millis(end)?)
}

fn unpaired_window() -> ServiceError {
    ServiceError::Validation("start and end must be supplied together".to_string())
}
