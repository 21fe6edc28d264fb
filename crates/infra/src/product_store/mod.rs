//! Product persistence boundary.
//!
//! The service layer talks to storage only through [`ProductStore`]; it never
//! sees SQL. Availability is persisted as opaque text here: encoding and
//! decoding of windows happens above this boundary.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use r#trait::{ProductStore, StoreError};
pub use sqlite::SqliteProductStore;
