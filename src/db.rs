//! Bounded PostgreSQL pool for the service side: scoped connection acquisition and
//! materialization of result rows as JSON records keyed by column name.
//!
//! Connections are autocommit only; transactions are not managed here.

use crate::config::{validate_db_config, DbConfig};
use crate::error::{ConfigError, DbError};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::pool::PoolConnection;
use sqlx::postgres::types::{PgHstore, PgMoney};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{Column, PgConnection, PgPool, Postgres, Row, TypeInfo, ValueRef};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One result row: column name -> value, in column order.
pub type Record = Map<String, Value>;

#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
    in_use: Arc<AtomicUsize>,
}

impl DbPool {
    /// Build the pool with `pool_min`..=`pool_max` connections. `min` connections are opened eagerly.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        validate_db_config(config)?;
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min)
            .max_connections(config.pool_max)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;
        tracing::info!(min = config.pool_min, max = config.pool_max, "database pool ready");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        DbPool {
            pool,
            in_use: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out a connection; waits while the pool is exhausted. The connection goes back
    /// to the pool when the returned guard is dropped or passed to [`DbPool::release`].
    pub async fn acquire(&self, autocommit: bool) -> Result<PooledConnection, DbError> {
        if !autocommit {
            return Err(DbError::Unsupported(
                "only autocommit connections are available".into(),
            ));
        }
        let conn = self.pool.acquire().await?;
        let in_use = self.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(in_use, "connection acquired");
        Ok(PooledConnection {
            conn,
            in_use: Arc::clone(&self.in_use),
        })
    }

    pub fn release(&self, conn: PooledConnection) {
        drop(conn);
    }

    /// Connections currently checked out through [`DbPool::acquire`].
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    /// Open connections, idle or not.
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    pub fn idle(&self) -> usize {
        self.pool.num_idle()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A checked-out connection. Dereferences to [`PgConnection`] for use as a sqlx executor.
pub struct PooledConnection {
    conn: PoolConnection<Postgres>,
    in_use: Arc<AtomicUsize>,
}

impl PooledConnection {
    /// Run `sql` and materialize every row as a [`Record`].
    pub async fn fetch_records(&mut self, sql: &str) -> Result<Vec<Record>, DbError> {
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(sql).fetch_all(&mut *self.conn).await?;
        Ok(fetch_all_as_records(&rows))
    }
}

impl Deref for PooledConnection {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let in_use = self.in_use.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(in_use, "connection released");
    }
}

fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, DbError> {
    if let Some(url) = &config.database_url {
        return PgConnectOptions::from_str(url).map_err(|e| {
            DbError::Config(ConfigError::Invalid {
                key: "database_url",
                reason: e.to_string(),
            })
        });
    }
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password);
    if !config.database.is_empty() {
        options = options.database(&config.database);
    }
    Ok(options)
}

/// Rows as records keyed by column name.
pub fn fetch_all_as_records(rows: &[PgRow]) -> Vec<Record> {
    rows.iter().map(row_to_record).collect()
}

fn row_to_record(row: &PgRow) -> Record {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), cell_to_value(row, col.ordinal(), col.type_info().name())))
        .collect()
}

/// Decode one cell by its PostgreSQL type. NULLs and types without a mapping below become
/// `Value::Null`.
fn cell_to_value(row: &PgRow, idx: usize, pg_type: &str) -> Value {
    fn get<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
    where
        T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    {
        row.try_get::<Option<T>, _>(idx).ok().flatten()
    }

    fn array<'r, T>(row: &'r PgRow, idx: usize) -> Option<Value>
    where
        T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + Into<Value>,
        Vec<Option<T>>: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    {
        get::<Vec<Option<T>>>(row, idx).map(|items| {
            Value::Array(
                items
                    .into_iter()
                    .map(|v| v.map(Into::into).unwrap_or(Value::Null))
                    .collect(),
            )
        })
    }

    let value = match pg_type.to_ascii_uppercase().as_str() {
        "BOOL" => get::<bool>(row, idx).map(Value::Bool),
        "INT2" => get::<i16>(row, idx).map(Value::from),
        "INT4" => get::<i32>(row, idx).map(Value::from),
        "INT8" => get::<i64>(row, idx).map(Value::from),
        "FLOAT4" => get::<f32>(row, idx).map(Value::from),
        "FLOAT8" => get::<f64>(row, idx).map(Value::from),
        "NUMERIC" => get::<Decimal>(row, idx).map(decimal_to_value),
        "MONEY" => get::<PgMoney>(row, idx).map(|m| decimal_to_value(m.to_decimal(2))),
        "UUID" => get::<uuid::Uuid>(row, idx).map(|u| Value::String(u.to_string())),
        "TIMESTAMPTZ" => get::<chrono::DateTime<chrono::Utc>>(row, idx)
            .map(|d| Value::String(d.to_rfc3339())),
        "TIMESTAMP" => get::<chrono::NaiveDateTime>(row, idx)
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "DATE" => get::<chrono::NaiveDate>(row, idx)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "JSON" | "JSONB" => get::<Value>(row, idx),
        "HSTORE" => get::<PgHstore>(row, idx).map(|h| {
            Value::Object(
                h.0.into_iter()
                    .map(|(k, v)| (k, v.map(Value::String).unwrap_or(Value::Null)))
                    .collect(),
            )
        }),
        "BOOL[]" => array::<bool>(row, idx),
        "INT2[]" => array::<i16>(row, idx),
        "INT4[]" => array::<i32>(row, idx),
        "INT8[]" => array::<i64>(row, idx),
        "FLOAT8[]" => array::<f64>(row, idx),
        "TEXT[]" | "VARCHAR[]" => array::<String>(row, idx),
        "NUMERIC[]" => get::<Vec<Option<Decimal>>>(row, idx).map(|items| {
            Value::Array(
                items
                    .into_iter()
                    .map(|d| d.map(decimal_to_value).unwrap_or(Value::Null))
                    .collect(),
            )
        }),
        _ => get::<String>(row, idx).map(Value::String),
    };
    value.unwrap_or_else(|| {
        if !row.try_get_raw(idx).map(|raw| raw.is_null()).unwrap_or(true) {
            tracing::debug!(column = idx, pg_type, "no JSON mapping for column type, using null");
        }
        Value::Null
    })
}

/// JSON number when the decimal fits one, otherwise its exact text.
fn decimal_to_value(d: Decimal) -> Value {
    let text = d.normalize().to_string();
    text.parse::<serde_json::Number>()
        .map(Value::Number)
        .unwrap_or(Value::String(text))
}
