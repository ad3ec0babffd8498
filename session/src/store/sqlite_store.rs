//! SqliteAdapter
//! --------------
//! SQLite-backed implementation of the `Adapter` contract. Persons and
//! sessions live in two tables; attribute objects are stored as JSON text and
//! expirations as Unix nanoseconds so that stored instants read back exactly.
//! Instants outside the nanosecond range (years 1677..=2262) are rejected.
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::Adapter;
use crate::model::{Person, PersonAttributes, Session, SessionAttributes, SessionPersonPair};

pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and ensure the schema exists.
    ///
    /// Missing database files are created. `sqlite::memory:` is pinned to a
    /// single connection so every query sees the same database.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let max_connections = if database_url.contains(":memory:") { 1 } else { 4 };

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url {database_url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open sqlite database at {database_url}"))?;

        let adapter = Self { pool };
        adapter.migrate().await?;
        Ok(adapter)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates tables and indexes if they do not exist.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS persons (
  id TEXT PRIMARY KEY,
  attributes_json TEXT NOT NULL
);
"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS sessions (
  id TEXT PRIMARY KEY,
  person_id TEXT NOT NULL,
  expire_dts BIGINT NOT NULL,
  attributes_json TEXT NOT NULL
);
"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_sessions_person ON sessions(person_id);"#)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert or replace a person row. Persons are seeded out of band.
    pub async fn insert_person(&self, person: &Person) -> anyhow::Result<()> {
        let attributes_json = serde_json::to_string(&person.attributes)?;

        sqlx::query(
            r#"
INSERT INTO persons (id, attributes_json)
VALUES (?, ?)
ON CONFLICT(id) DO UPDATE SET attributes_json = excluded.attributes_json;
"#,
        )
        .bind(&person.id)
        .bind(attributes_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a person together with all of their sessions.
    pub async fn delete_person(&self, person_id: &str) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE person_id = ?")
            .bind(person_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(person_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Adapter for SqliteAdapter {
    async fn session_person_pair(
        &self,
        session_id: &str,
    ) -> anyhow::Result<Option<SessionPersonPair>> {
        let row = sqlx::query(
            r#"
SELECT
  s.id, s.person_id, s.expire_dts, s.attributes_json,
  p.attributes_json AS person_attributes_json
FROM sessions s
INNER JOIN persons p ON p.id = s.person_id
WHERE s.id = ?;
"#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                let session = row_to_session(&r)?;
                let person = Person {
                    id: session.person_id.clone(),
                    attributes: parse_json::<PersonAttributes>(&r, "person_attributes_json")?,
                };
                Ok(Some((session, person)))
            }
            None => Ok(None),
        }
    }

    async fn person_sessions(&self, person_id: &str) -> anyhow::Result<Vec<Session>> {
        let rows = sqlx::query(
            r#"
SELECT id, person_id, expire_dts, attributes_json
FROM sessions
WHERE person_id = ?
ORDER BY expire_dts, id;
"#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_session).collect()
    }

    async fn set_session(&self, session: &Session) -> anyhow::Result<()> {
        let attributes_json = serde_json::to_string(&session.attributes)?;
        let expire_nanos = to_unix_nanos(session.expire_dts)?;

        sqlx::query(
            r#"
INSERT INTO sessions (id, person_id, expire_dts, attributes_json)
VALUES (?, ?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
  person_id = excluded.person_id,
  expire_dts = excluded.expire_dts,
  attributes_json = excluded.attributes_json;
"#,
        )
        .bind(&session.id)
        .bind(&session.person_id)
        .bind(expire_nanos)
        .bind(attributes_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_session_expiration(
        &self,
        session_id: &str,
        expire_dts: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let expire_nanos = to_unix_nanos(expire_dts)?;

        sqlx::query("UPDATE sessions SET expire_dts = ? WHERE id = ?")
            .bind(expire_nanos)
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired_sessions(&self) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE expire_dts < ?")
            .bind(to_unix_nanos(Utc::now())?)
            .execute(&self.pool)
            .await?;

        tracing::debug!(removed = result.rows_affected(), "expired sessions purged");
        Ok(())
    }

    async fn delete_person_sessions(&self, person_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE person_id = ?")
            .bind(person_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/* =========================
Row mapping
========================= */

fn row_to_session(r: &SqliteRow) -> anyhow::Result<Session> {
    let expire_nanos: i64 = r.try_get("expire_dts")?;
    let expire_dts = DateTime::from_timestamp_nanos(expire_nanos);

    Ok(Session {
        person_id: r.try_get("person_id")?,
        id: r.try_get("id")?,
        expire_dts,
        attributes: parse_json::<SessionAttributes>(r, "attributes_json")?,
    })
}

fn to_unix_nanos(ts: DateTime<Utc>) -> anyhow::Result<i64> {
    ts.timestamp_nanos_opt()
        .ok_or_else(|| anyhow!("expire_dts out of nanosecond range: {ts}"))
}

fn parse_json<T: serde::de::DeserializeOwned>(r: &SqliteRow, column: &str) -> anyhow::Result<T> {
    let raw: String = r.try_get(column)?;
    serde_json::from_str(&raw).with_context(|| format!("invalid {column} '{raw}'"))
}
