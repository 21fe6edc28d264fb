//! SQLite-backed product store.
//!
//! One row per product. Availability lives in a single `TEXT` column holding
//! the encoded window list (`[]` when empty); timestamps are RFC 3339 text.
//!
//! ## Error Mapping
//!
//! Every `sqlx::Error` becomes `StoreError::Backend` tagged with the operation
//! name. Rows whose enum or timestamp columns do not parse become
//! `StoreError::Decode`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::instrument;

use kitshelf_core::ProductId;
use kitshelf_products::{Brand, Color, NewProduct, ProductPatch, ProductRecord, Size};

use super::r#trait::{ProductStore, StoreError};

/// SQLite-backed product store.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone; each operation checks a
/// connection out of the pool and returns it when the query completes.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `url`, e.g.
    /// `sqlite://database/database.sqlite`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("connect", e))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Backend(format!(
                        "failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    /// Private in-memory database (tests/dev).
    ///
    /// Limited to one connection: every SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    /// Create the `products` table if it does not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                name         TEXT NOT NULL,
                brand        TEXT NOT NULL CHECK (brand IN ('Kipsta', 'Quechua', 'Artengo')),
                size         TEXT NOT NULL CHECK (size IN ('S', 'M', 'L')),
                color        TEXT NOT NULL CHECK (color IN ('Blue', 'Green', 'White')),
                availability TEXT NOT NULL DEFAULT '[]',
                created_at   TEXT NOT NULL,
                updated_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn load(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, size, color, availability, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load", e))?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn load_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, brand, size, color, availability, created_at, updated_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_all", e))?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip(self, product), fields(name = %product.name), err)]
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, StoreError> {
        let now = truncated_now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, brand, size, color, availability, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&product.name)
        .bind(product.brand.as_str())
        .bind(product.size.as_str())
        .bind(product.color.as_str())
        .bind(&product.availability)
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Ok(ProductRecord {
            id: ProductId::new(result.last_insert_rowid()),
            name: product.name,
            brand: product.brand,
            size: product.size,
            color: product.color,
            availability: product.availability,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE products SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(name) = patch.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(brand) = patch.brand {
                set.push("brand = ").push_bind_unseparated(brand.as_str());
            }
            if let Some(size) = patch.size {
                set.push("size = ").push_bind_unseparated(size.as_str());
            }
            if let Some(color) = patch.color {
                set.push("color = ").push_bind_unseparated(color.as_str());
            }
            if let Some(availability) = patch.availability {
                set.push("availability = ").push_bind_unseparated(availability);
            }
            set.push("updated_at = ")
                .push_bind_unseparated(format_timestamp(truncated_now()));
        }
        qb.push(" WHERE id = ").push_bind(id.get());

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<ProductRecord, StoreError> {
    let id: i64 = get_column(row, "id")?;
    let brand: String = get_column(row, "brand")?;
    let size: String = get_column(row, "size")?;
    let color: String = get_column(row, "color")?;
    let created_at: String = get_column(row, "created_at")?;
    let updated_at: String = get_column(row, "updated_at")?;

    Ok(ProductRecord {
        id: ProductId::new(id),
        name: get_column(row, "name")?,
        brand: parse_column::<Brand>("brand", &brand)?,
        size: parse_column::<Size>("size", &size)?,
        color: parse_column::<Color>("color", &color)?,
        availability: get_column(row, "availability")?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}

fn get_column<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Decode(format!("products.{column}: {e}")))
}

fn parse_column<T>(column: &str, raw: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    raw.parse()
        .map_err(|e| StoreError::Decode(format!("products.{column}: {e}")))
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("products.{column}: {e}")))
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Stored timestamps carry milliseconds; keep returned records identical to reloaded ones.
fn truncated_now() -> DateTime<Utc> {
    use chrono::SubsecRound;
    Utc::now().trunc_subsecs(3)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("{operation} failed: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteProductStore {
        let store = SqliteProductStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn racket() -> NewProduct {
        NewProduct::new("Racket", Brand::Artengo, Size::M, Color::White, None).unwrap()
    }

    #[tokio::test]
    async fn connect_creates_missing_database_directory() {
        let root = std::env::temp_dir().join(format!(
            "kitshelf-sqlite-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let db_path = root.join("nested").join("database.sqlite");
        let url = format!("sqlite://{}", db_path.display());

        let store = SqliteProductStore::connect(&url).await.unwrap();
        store.migrate().await.unwrap();
        let created = store.create(racket()).await.unwrap();
        assert!(db_path.exists());
        assert_eq!(store.load(created.id).await.unwrap(), Some(created));

        store.pool().close().await;
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let store = store().await;
        store.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn created_rows_load_back_identically() {
        let store = store().await;
        let created = store.create(racket()).await.unwrap();

        let loaded = store.load(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.availability, "[]");
    }

    #[tokio::test]
    async fn availability_column_defaults_to_empty_array() {
        let store = store().await;
        sqlx::query(
            "INSERT INTO products (name, brand, size, color, created_at, updated_at) \
             VALUES ('Ball', 'Kipsta', 'S', 'Blue', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].availability, "[]");
    }

    #[tokio::test]
    async fn update_touches_only_supplied_columns() {
        let store = store().await;
        let created = store.create(racket()).await.unwrap();

        let patch = ProductPatch {
            size: Some(Size::L),
            availability: Some(
                r#"["2024-01-01T00:00:00.000Z/2024-01-02T00:00:00.000Z"]"#.to_string(),
            ),
            ..ProductPatch::default()
        };
        assert_eq!(store.update(created.id, patch).await.unwrap(), 1);

        let loaded = store.load(created.id).await.unwrap().unwrap();
        assert_eq!(loaded.size, Size::L);
        assert_eq!(loaded.brand, Brand::Artengo);
        assert_eq!(
            loaded.availability,
            r#"["2024-01-01T00:00:00.000Z/2024-01-02T00:00:00.000Z"]"#
        );
    }

    #[tokio::test]
    async fn empty_patch_and_missing_rows_affect_nothing() {
        let store = store().await;
        let created = store.create(racket()).await.unwrap();

        assert_eq!(store.update(created.id, ProductPatch::default()).await.unwrap(), 0);

        let patch = ProductPatch {
            name: Some("Ghost".to_string()),
            ..ProductPatch::default()
        };
        assert_eq!(store.update(ProductId::new(404), patch).await.unwrap(), 0);
        assert_eq!(store.delete(ProductId::new(404)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = store().await;
        let created = store.create(racket()).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), 1);
        assert!(store.load(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_enum_values_surface_as_decode_errors() {
        let store = store().await;
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO products (name, brand, size, color, created_at, updated_at) \
             VALUES ('Ball', 'Nike', 'S', 'Blue', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
