//! Postgres-backed product store.
//!
//! Implements the `EntityStore<Product>` contract on a `productos` table. The
//! CRUD outcomes are decided by the database in the same statement as the
//! write:
//!
//! | Operation | Mechanism | Outcome |
//! |-----------|-----------|---------|
//! | `insert` | `UNIQUE (nombre)`, SQLSTATE `23505` | `Duplicate` |
//! | `update_field` | `rows_affected() == 0` | `NotFound` |
//! | `delete` | `rows_affected() == 0` | `NotFound` |
//!
//! ## Connections
//!
//! Outside a session every store call opens one `PgConnection`, uses it, and
//! closes it before returning. Between `begin_session` and `end_session` all
//! calls share a single connection, so a whole console command (existence
//! check, confirmation, delete) runs on one connection. Error paths hand the
//! connection back before the error is returned.
//!
//! ## Runtime
//!
//! The console loop is synchronous; the store owns a current-thread tokio
//! runtime and drives each sqlx future to completion with `block_on`.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Row};
use tokio::runtime::Runtime;
use tracing::instrument;

use verduleria_core::{Entity, Price, ProductKind, ProductName, Stock};
use verduleria_products::{Product, ProductChange, ProductUpdate};

use super::r#trait::{EntityStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS productos (
        id                  BIGSERIAL PRIMARY KEY,
        nombre              TEXT NOT NULL UNIQUE,
        tipo                TEXT NOT NULL CHECK (tipo IN ('fruta', 'verdura')),
        precio              DOUBLE PRECISION NOT NULL CHECK (precio > 0),
        stock               BIGINT NOT NULL DEFAULT 0 CHECK (stock >= 0),
        fecha_creacion      TIMESTAMPTZ NOT NULL DEFAULT now(),
        fecha_actualizacion TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const SELECT_COLUMNS: &str =
    "SELECT nombre, tipo, precio, stock, fecha_creacion, fecha_actualizacion FROM productos";

/// Connection held for the current session, if any.
#[derive(Default)]
struct SessionState {
    conn: Option<PgConnection>,
    depth: usize,
}

/// A connection checked out for one store call.
struct Lease {
    conn: PgConnection,
    held: bool,
}

/// Postgres-backed store for inventory products.
pub struct PostgresProductStore {
    url: String,
    runtime: Runtime,
    session: Mutex<SessionState>,
}

impl core::fmt::Debug for PostgresProductStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // The URL may carry credentials.
        f.debug_struct("PostgresProductStore").finish_non_exhaustive()
    }
}

impl PostgresProductStore {
    /// Build the store and make sure the `productos` table exists.
    ///
    /// Fails if the database is unreachable, so a bad `DATABASE_URL` is
    /// reported at startup rather than on the first command.
    pub fn connect(url: impl Into<String>) -> Result<Self, StoreError> {
        let store = Self::detached(url)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Build the store without touching the database.
    fn detached(url: impl Into<String>) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::backend(format!("failed to create runtime: {e}")))?;

        Ok(Self {
            url: url.into(),
            runtime,
            session: Mutex::new(SessionState::default()),
        })
    }

    #[instrument(skip(self), err)]
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query(CREATE_TABLE).execute(&mut lease.conn).await;
            self.release(lease).await?;
            result.map_err(|e| map_sqlx_error("create_table", e))?;
            Ok(())
        })
    }

    fn session_state(&self) -> Result<MutexGuard<'_, SessionState>, StoreError> {
        self.session
            .lock()
            .map_err(|_| StoreError::backend("session lock poisoned"))
    }

    async fn open(&self) -> Result<PgConnection, StoreError> {
        PgConnection::connect(&self.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))
    }

    /// Take the session connection, or open a fresh one outside a session.
    async fn acquire(&self) -> Result<Lease, StoreError> {
        let held = self.session_state()?.conn.take();
        match held {
            Some(conn) => Ok(Lease { conn, held: true }),
            None => Ok(Lease {
                conn: self.open().await?,
                held: false,
            }),
        }
    }

    /// Return a session connection, or close a per-call one.
    async fn release(&self, lease: Lease) -> Result<(), StoreError> {
        if lease.held {
            self.session_state()?.conn = Some(lease.conn);
            Ok(())
        } else {
            close(lease.conn).await
        }
    }

    /// Remove every product. Test support only.
    #[cfg(test)]
    fn clear(&self) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query("DELETE FROM productos")
                .execute(&mut lease.conn)
                .await;
            self.release(lease).await?;
            result.map_err(|e| map_sqlx_error("clear", e))?;
            Ok(())
        })
    }

    /// Server process id of the connection a call would use. Test support only.
    #[cfg(test)]
    fn backend_pid(&self) -> Result<i32, StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result: Result<i32, sqlx::Error> = sqlx::query_scalar("SELECT pg_backend_pid()")
                .fetch_one(&mut lease.conn)
                .await;
            self.release(lease).await?;
            result.map_err(|e| map_sqlx_error("backend_pid", e))
        })
    }
}

impl EntityStore<Product> for PostgresProductStore {
    #[instrument(skip(self), err)]
    fn begin_session(&self) -> Result<(), StoreError> {
        if self.session_state()?.depth > 0 {
            self.session_state()?.depth += 1;
            return Ok(());
        }

        let conn = self.runtime.block_on(self.open())?;
        let mut state = self.session_state()?;
        state.conn = Some(conn);
        state.depth = 1;
        tracing::debug!("store session opened");
        Ok(())
    }

    #[instrument(skip(self), err)]
    fn end_session(&self) -> Result<(), StoreError> {
        let conn = {
            let mut state = self.session_state()?;
            match state.depth {
                0 => return Ok(()),
                1 => {
                    state.depth = 0;
                    state.conn.take()
                }
                _ => {
                    state.depth -= 1;
                    return Ok(());
                }
            }
        };

        tracing::debug!("store session closed");
        match conn {
            Some(conn) => self.runtime.block_on(close(conn)),
            None => Ok(()),
        }
    }

    #[instrument(skip(self, product), fields(key = product.key()), err)]
    fn insert(&self, product: Product) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query(
                r#"
                INSERT INTO productos (nombre, tipo, precio, stock, fecha_creacion, fecha_actualizacion)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(product.name().as_str())
            .bind(product.kind().as_str())
            .bind(product.price().value())
            .bind(i64::from(product.stock().units()))
            .bind(product.created_at())
            .bind(product.updated_at())
            .execute(&mut lease.conn)
            .await;
            self.release(lease).await?;

            let done = result.map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(product.key().to_string())
                } else {
                    map_sqlx_error("insert", e)
                }
            })?;

            if done.rows_affected() == 0 {
                return Err(StoreError::backend(format!(
                    "insert of '{}' affected no rows",
                    product.key()
                )));
            }
            Ok(())
        })
    }

    #[instrument(skip(self), err)]
    fn update_field(&self, key: &str, update: ProductUpdate) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let query = match update.change {
                ProductChange::Price(price) => sqlx::query(
                    "UPDATE productos SET precio = $1, fecha_actualizacion = $2 WHERE nombre = $3",
                )
                .bind(price.value()),
                ProductChange::Stock(stock) => sqlx::query(
                    "UPDATE productos SET stock = $1, fecha_actualizacion = $2 WHERE nombre = $3",
                )
                .bind(i64::from(stock.units())),
            };

            let mut lease = self.acquire().await?;
            let result = query
                .bind(update.occurred_at)
                .bind(key)
                .execute(&mut lease.conn)
                .await;
            self.release(lease).await?;

            let done = result.map_err(|e| map_sqlx_error("update_field", e))?;
            if done.rows_affected() == 0 {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Ok(())
        })
    }

    #[instrument(skip(self), err)]
    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query("DELETE FROM productos WHERE nombre = $1")
                .bind(key)
                .execute(&mut lease.conn)
                .await;
            self.release(lease).await?;

            let done = result.map_err(|e| map_sqlx_error("delete", e))?;
            if done.rows_affected() == 0 {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Ok(())
        })
    }

    #[instrument(skip(self), err)]
    fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
                .fetch_all(&mut lease.conn)
                .await;
            self.release(lease).await?;

            let rows = result.map_err(|e| map_sqlx_error("list_all", e))?;
            rows.iter().map(product_from_row).collect::<Result<Vec<_>, _>>()
        })
    }

    #[instrument(skip(self), err)]
    fn get(&self, key: &str) -> Result<Option<Product>, StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query(&format!("{SELECT_COLUMNS} WHERE nombre = $1"))
                .bind(key)
                .fetch_optional(&mut lease.conn)
                .await;
            self.release(lease).await?;

            let row = result.map_err(|e| map_sqlx_error("get", e))?;
            row.as_ref().map(product_from_row).transpose()
        })
    }

    #[instrument(skip(self), err)]
    fn count(&self) -> Result<usize, StoreError> {
        self.runtime.block_on(async {
            let mut lease = self.acquire().await?;
            let result = sqlx::query("SELECT COUNT(*) AS total FROM productos")
                .fetch_one(&mut lease.conn)
                .await;
            self.release(lease).await?;

            let row = result.map_err(|e| map_sqlx_error("count", e))?;
            let total: i64 = row
                .try_get("total")
                .map_err(|e| map_sqlx_error("count", e))?;
            usize::try_from(total)
                .map_err(|_| StoreError::backend(format!("invalid row count {total}")))
        })
    }
}

async fn close(conn: PgConnection) -> Result<(), StoreError> {
    conn.close().await.map_err(|e| map_sqlx_error("close", e))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_row", e);

    let name: String = row.try_get("nombre").map_err(decode)?;
    let kind: String = row.try_get("tipo").map_err(decode)?;
    let price: f64 = row.try_get("precio").map_err(decode)?;
    let stock: i64 = row.try_get("stock").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("fecha_creacion").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("fecha_actualizacion").map_err(decode)?;

    let corrupt = |e: verduleria_core::DomainError| {
        StoreError::backend(format!("corrupt product row '{name}': {e}"))
    };

    Ok(Product::restore(
        ProductName::parse(&name).map_err(corrupt)?,
        kind.parse::<ProductKind>().map_err(corrupt)?,
        Price::new(price).map_err(corrupt)?,
        Stock::try_from(stock).map_err(corrupt)?,
        created_at,
        updated_at,
    ))
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            tracing::error!(operation, code = ?db_err.code(), "{msg}");
            StoreError::Backend(msg)
        }
        sqlx::Error::RowNotFound => {
            StoreError::backend(format!("unexpected row not found in {operation}"))
        }
        other => {
            tracing::error!(operation, error = %other, "sqlx error");
            StoreError::backend(format!("sqlx error in {operation}: {other}"))
        }
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

#[cfg(test)]
mod tests {
    //! These tests need a reachable Postgres; run them with
    //! `DATABASE_URL=postgres://... cargo test -- --ignored`.

    use super::*;

    fn store() -> PostgresProductStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PostgresProductStore::connect(url).expect("failed to connect");
        store.clear().expect("failed to clear productos");
        store
    }

    fn product(name: &str, price: f64, stock: u32) -> Product {
        Product::new(
            ProductName::parse(name).unwrap(),
            ProductKind::Vegetable,
            Price::new(price).unwrap(),
            Stock::new(stock),
            Utc::now(),
        )
    }

    #[test]
    fn unreachable_database_is_a_backend_error() {
        let err = PostgresProductStore::connect("postgres://nobody@127.0.0.1:1/none").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn failed_begin_leaves_no_session() {
        let store = PostgresProductStore::detached("postgres://nobody@127.0.0.1:1/none").unwrap();
        assert!(store.end_session().is_ok());

        let err = store.begin_session().unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.session_state().unwrap().depth, 0);
    }

    #[test]
    #[ignore = "requires DATABASE_URL"]
    fn session_shares_one_connection_across_calls() {
        let store = store();

        let outside_a = store.backend_pid().unwrap();
        let outside_b = store.backend_pid().unwrap();
        assert_ne!(outside_a, outside_b);

        store.begin_session().unwrap();
        let first = store.backend_pid().unwrap();
        store.insert(product("pepino", 3.0, 2)).unwrap();
        assert!(matches!(
            store.insert(product("pepino", 3.0, 2)),
            Err(StoreError::Duplicate(_))
        ));
        store.delete("pepino").unwrap();
        assert_eq!(store.backend_pid().unwrap(), first);
        store.end_session().unwrap();

        assert!(store.session_state().unwrap().conn.is_none());
    }

    #[test]
    #[ignore = "requires DATABASE_URL"]
    fn crud_contract_against_postgres() {
        let store = store();
        assert_eq!(store.count().unwrap(), 0);

        store.insert(product("zanahoria", 12.5, 40)).unwrap();
        store.insert(product("lechuga", 8.0, 10)).unwrap();

        let dup = store.insert(product("zanahoria", 1.0, 1)).unwrap_err();
        assert!(matches!(dup, StoreError::Duplicate(_)));

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|p| p.key().to_string())
            .collect();
        assert_eq!(names, vec!["zanahoria", "lechuga"]);

        store
            .update_field("lechuga", ProductUpdate::now(ProductChange::Stock(Stock::new(3))))
            .unwrap();
        let lechuga = store.get("lechuga").unwrap().unwrap();
        assert_eq!(lechuga.stock(), Stock::new(3));
        assert_eq!(lechuga.price().value(), 8.0);

        store.delete("zanahoria").unwrap();
        assert!(matches!(store.delete("zanahoria"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update_field(
                "zanahoria",
                ProductUpdate::now(ProductChange::Price(Price::new(2.0).unwrap()))
            ),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.count().unwrap(), 1);
    }
}
