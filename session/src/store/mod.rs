//! The persistence contract a session adapter has to honour, plus the two
//! reference implementations shipped with the workspace.
pub mod memory_store;
pub mod sqlite_store;

use chrono::{DateTime, Utc};

use crate::model::{Session, SessionPersonPair};

pub use memory_store::MemoryAdapter;
pub use sqlite_store::SqliteAdapter;

#[async_trait::async_trait]
pub trait Adapter: Send + Sync {
    /// Session and owning person, or `None` when either is unknown.
    async fn session_person_pair(
        &self,
        session_id: &str,
    ) -> anyhow::Result<Option<SessionPersonPair>>;

    /// All sessions issued for the person. Empty when there are none.
    async fn person_sessions(&self, person_id: &str) -> anyhow::Result<Vec<Session>>;

    /// Insert or replace a session keyed by its id.
    async fn set_session(&self, session: &Session) -> anyhow::Result<()>;

    async fn delete_session(&self, session_id: &str) -> anyhow::Result<()>;

    async fn update_session_expiration(
        &self,
        session_id: &str,
        expire_dts: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    /// Remove every session whose expiration is strictly before the call time.
    async fn delete_expired_sessions(&self) -> anyhow::Result<()>;

    async fn delete_person_sessions(&self, person_id: &str) -> anyhow::Result<()>;
}
