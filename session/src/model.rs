use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub type PersonId = String;
pub type SessionId = String;

/// A session paired with the person it was issued for.
pub type SessionPersonPair = (Session, Person);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAttributes {
    pub login: String,
}

/// The identity a session is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub attributes: PersonAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAttributes {
    pub country: String,
}

/// A time-bounded credential record linked to a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub person_id: PersonId,
    pub id: SessionId,
    pub expire_dts: DateTime<Utc>,
    pub attributes: SessionAttributes,
}

impl Session {
    /// Returns true once `now` has reached the expiration instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expire_dts
    }
}

/// Drops the sub-second component so stored instants compare exactly.
pub fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Timelike};

    fn mk_session(expire_dts: DateTime<Utc>) -> Session {
        Session {
            person_id: "p".repeat(15),
            id: "s".repeat(40),
            expire_dts,
            attributes: SessionAttributes {
                country: "us".into(),
            },
        }
    }

    #[test]
    fn truncate_drops_subsecond_component() {
        let ts = Utc.timestamp_opt(1_700_000_000, 987_654_321).unwrap();
        let t = truncate_to_second(ts);

        assert_eq!(t.timestamp(), 1_700_000_000);
        assert_eq!(t.nanosecond(), 0);
    }

    #[test]
    fn truncate_is_noop_on_whole_seconds() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(truncate_to_second(ts), ts);
    }

    #[test]
    fn not_expired_before_deadline() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let s = mk_session(now + Duration::seconds(10));
        assert!(!s.is_expired(now));
    }

    #[test]
    fn expired_at_boundary_inclusive() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let s = mk_session(now);
        assert!(s.is_expired(now)); // boundary inclusive
        assert!(s.is_expired(now + Duration::seconds(1)));
    }

    #[test]
    fn attributes_serialize_as_plain_json_objects() {
        let json = serde_json::to_string(&SessionAttributes {
            country: "us".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"country":"us"}"#);

        let back: PersonAttributes = serde_json::from_str(r#"{"login":"abc"}"#).unwrap();
        assert_eq!(back.login, "abc");
    }
}
