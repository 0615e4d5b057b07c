use async_trait::async_trait;
use serde::Serialize;
use sqlx::{postgres::{PgConnectOptions, PgRow}, Connection, PgConnection, Row};
use thiserror::Error;
use tracing::instrument;

const LIST_USERS_SQL: &str = "SELECT id, name, email FROM users LIMIT 100;";

/// One row of the externally owned `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Open a connection and close it again.
    async fn ping(&self) -> Result<(), StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

/// Opens a fresh connection for every call; nothing is pooled.
pub struct PgUserStore {
    opts: PgConnectOptions,
}

impl PgUserStore {
    pub fn new(opts: PgConnectOptions) -> Self { Self { opts } }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        Ok(PgConnection::connect_with(&self.opts).await?)
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    // int4 (serial) or int8 (bigserial), whichever the table uses
    let id = match row.try_get::<i64, _>("id") {
        Ok(id) => id,
        Err(_) => i64::from(row.try_get::<i32, _>("id")?),
    };
    Ok(User { id, name: row.try_get("name")?, email: row.try_get("email")? })
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.connect().await?;
        conn.close().await?;
        Ok(())
    }

    #[instrument(skip(self), fields(db.system = "postgresql", db.statement = LIST_USERS_SQL))]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query(LIST_USERS_SQL).fetch_all(&mut conn).await?;
        conn.close().await?;
        let users = rows.iter().map(user_from_row).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = users.len(), "users fetched");
        Ok(users)
    }
}
