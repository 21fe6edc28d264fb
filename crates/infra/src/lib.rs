//! Infrastructure layer: product persistence and the service that drives it.

pub mod product_service;
pub mod product_store;

pub use product_service::{CreateProduct, ProductService, ProductView, ServiceError, UpdateProduct};
pub use product_store::{InMemoryProductStore, ProductStore, SqliteProductStore, StoreError};
