use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::Adapter;
use crate::model::{Person, PersonId, Session, SessionId, SessionPersonPair};

/// In-process adapter backed by two hash maps.
///
/// Useful as a reference for adapter authors and as a fast target for tests.
#[derive(Default)]
pub struct MemoryAdapter {
    persons: Mutex<HashMap<PersonId, Person>>,
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a person; the adapter contract itself never creates persons.
    pub async fn insert_person(&self, person: Person) {
        self.persons.lock().await.insert(person.id.clone(), person);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn session_person_pair(
        &self,
        session_id: &str,
    ) -> anyhow::Result<Option<SessionPersonPair>> {
        let sessions = self.sessions.lock().await;
        let Some(session) = sessions.get(session_id) else {
            return Ok(None);
        };

        let persons = self.persons.lock().await;
        Ok(persons
            .get(&session.person_id)
            .map(|person| (session.clone(), person.clone())))
    }

    async fn person_sessions(&self, person_id: &str) -> anyhow::Result<Vec<Session>> {
        let sessions = self.sessions.lock().await;
        let mut out: Vec<Session> = sessions
            .values()
            .filter(|s| s.person_id == person_id)
            .cloned()
            .collect();

        out.sort_by(|a, b| a.expire_dts.cmp(&b.expire_dts).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn set_session(&self, session: &Session) -> anyhow::Result<()> {
        self.sessions
            .lock()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> anyhow::Result<()> {
        self.sessions.lock().await.remove(session_id);
        Ok(())
    }

    async fn update_session_expiration(
        &self,
        session_id: &str,
        expire_dts: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if let Some(s) = self.sessions.lock().await.get_mut(session_id) {
            s.expire_dts = expire_dts;
        }
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> anyhow::Result<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, s| s.expire_dts >= now);

        tracing::debug!(removed = before - sessions.len(), "expired sessions purged");
        Ok(())
    }

    async fn delete_person_sessions(&self, person_id: &str) -> anyhow::Result<()> {
        self.sessions
            .lock()
            .await
            .retain(|_, s| s.person_id != person_id);
        Ok(())
    }
}
