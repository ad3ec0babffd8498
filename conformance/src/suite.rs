//! The ordered adapter conformance run.
//!
//! Scenarios share state: each one starts from whatever the previous one left
//! in the adapter, so they always run in [`Scenario::ALL`] order and the first
//! failure ends the run.
use std::fmt::Debug;
use std::time::Duration;

use chrono::Utc;
use tracing::Instrument;

use common::logger::{TraceId, root_span, scenario_span, warn_if_slow};
use session::model::{Person, PersonAttributes, Session, SessionAttributes, truncate_to_second};
use session::store::Adapter;

use crate::error::ConformanceError;
use crate::id::{IdGenerator, PERSON_ID_LEN, RandomIdGenerator, SESSION_ID_LEN};
use crate::reporter::{Reporter, TracingReporter};

/// Offset applied to "now" for the primary session, and again on update.
const EXPIRY_STEP_SECS: i64 = 10;

const DEFAULT_SLOW_SCENARIO: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    UnknownSessionLookup,
    UnknownPersonListing,
    SetAndLookup,
    DeleteSession,
    UpdateExpiration,
    DeleteExpired,
    DeletePersonSessions,
}

impl Scenario {
    pub const ALL: [Scenario; 7] = [
        Scenario::UnknownSessionLookup,
        Scenario::UnknownPersonListing,
        Scenario::SetAndLookup,
        Scenario::DeleteSession,
        Scenario::UpdateExpiration,
        Scenario::DeleteExpired,
        Scenario::DeletePersonSessions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::UnknownSessionLookup => {
                "session_person_pair() returns no pair on unknown session id"
            }
            Scenario::UnknownPersonListing => {
                "person_sessions() returns empty list on unknown person id"
            }
            Scenario::SetAndLookup => {
                "set_session() stores session and session_person_pair() returns it with its person"
            }
            Scenario::DeleteSession => "delete_session() deletes session",
            Scenario::UpdateExpiration => "update_session_expiration() updates session",
            Scenario::DeleteExpired => "delete_expired_sessions() deletes all expired sessions",
            Scenario::DeletePersonSessions => {
                "delete_person_sessions() deletes all sessions of the person"
            }
        }
    }
}

/// Builds the person a run is performed for.
///
/// The adapter contract has no way to create persons, so callers seed this
/// value into the adapter's backing store before calling [`AdapterTestSuite::run`].
pub fn fixture_person(ids: &dyn IdGenerator) -> Person {
    Person {
        id: ids.random_string(PERSON_ID_LEN),
        attributes: PersonAttributes {
            login: ids.random_string(PERSON_ID_LEN),
        },
    }
}

/// Runs the suite for `person` with random ids and tracing output.
pub async fn test_adapter<A>(adapter: &A, person: &Person) -> Result<(), ConformanceError>
where
    A: Adapter + ?Sized,
{
    AdapterTestSuite::new(person.clone()).run(adapter).await
}

pub struct AdapterTestSuite {
    person: Person,
    ids: Box<dyn IdGenerator>,
    reporter: Box<dyn Reporter>,
    trace_id: TraceId,
    slow_scenario: Duration,
}

impl AdapterTestSuite {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            ids: Box::new(RandomIdGenerator),
            reporter: Box::new(TracingReporter),
            trace_id: TraceId::default(),
            slow_scenario: DEFAULT_SLOW_SCENARIO,
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = trace_id;
        self
    }

    /// Scenarios slower than this are logged as warnings. Nothing is aborted.
    pub fn with_slow_scenario_threshold(mut self, max: Duration) -> Self {
        self.slow_scenario = max;
        self
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Runs every scenario in order against `adapter`.
    ///
    /// Returns the first failure; later scenarios are not attempted.
    pub async fn run<A>(&self, adapter: &A) -> Result<(), ConformanceError>
    where
        A: Adapter + ?Sized,
    {
        let span = root_span("adapter_conformance", &self.trace_id);
        self.run_scenarios(adapter).instrument(span).await
    }

    async fn run_scenarios<A>(&self, adapter: &A) -> Result<(), ConformanceError>
    where
        A: Adapter + ?Sized,
    {
        self.reporter.suite_started();

        let mut primary = Session {
            person_id: self.person.id.clone(),
            id: self.ids.random_string(SESSION_ID_LEN),
            expire_dts: truncate_to_second(Utc::now())
                + chrono::Duration::seconds(EXPIRY_STEP_SECS),
            attributes: SessionAttributes {
                country: "us".into(),
            },
        };

        for (index, scenario) in Scenario::ALL.into_iter().enumerate() {
            let name = scenario.name();
            self.reporter.scenario_started(name);

            let outcome = warn_if_slow(
                "adapter_scenario",
                self.slow_scenario,
                self.check(scenario, adapter, &mut primary),
            )
            .instrument(scenario_span(index + 1, name))
            .await;

            match outcome {
                Ok(()) => self.reporter.scenario_passed(name),
                Err(e) => {
                    self.reporter.scenario_failed(name, &e);
                    return Err(e);
                }
            }
        }

        self.reporter.suite_passed();
        Ok(())
    }

    async fn check<A>(
        &self,
        scenario: Scenario,
        adapter: &A,
        primary: &mut Session,
    ) -> Result<(), ConformanceError>
    where
        A: Adapter + ?Sized,
    {
        let fail = adapter_failure(scenario);
        let person = &self.person;

        match scenario {
            Scenario::UnknownSessionLookup => {
                let result = adapter.session_person_pair(&primary.id).await.map_err(fail)?;
                expect_eq(scenario, &None, &result)
            }

            Scenario::UnknownPersonListing => {
                let result = adapter.person_sessions(&person.id).await.map_err(fail)?;
                expect_eq(scenario, &Vec::new(), &result)
            }

            Scenario::SetAndLookup => {
                adapter.set_session(primary).await.map_err(&fail)?;
                let result = adapter.session_person_pair(&primary.id).await.map_err(fail)?;
                expect_eq(scenario, &Some((primary.clone(), person.clone())), &result)
            }

            Scenario::DeleteSession => {
                adapter.delete_session(&primary.id).await.map_err(&fail)?;
                let result = adapter
                    .person_sessions(&primary.person_id)
                    .await
                    .map_err(fail)?;
                expect_eq(scenario, &Vec::new(), &result)
            }

            Scenario::UpdateExpiration => {
                adapter.set_session(primary).await.map_err(&fail)?;

                primary.expire_dts += chrono::Duration::seconds(EXPIRY_STEP_SECS);
                adapter
                    .update_session_expiration(&primary.id, primary.expire_dts)
                    .await
                    .map_err(&fail)?;

                let result = adapter.session_person_pair(&primary.id).await.map_err(fail)?;
                expect_eq(scenario, &Some((primary.clone(), person.clone())), &result)
            }

            Scenario::DeleteExpired => {
                let expired = Session {
                    person_id: person.id.clone(),
                    id: self.ids.random_string(SESSION_ID_LEN),
                    expire_dts: truncate_to_second(Utc::now())
                        - chrono::Duration::seconds(EXPIRY_STEP_SECS),
                    attributes: SessionAttributes {
                        country: "us".into(),
                    },
                };

                adapter.set_session(&expired).await.map_err(&fail)?;
                adapter.delete_expired_sessions().await.map_err(&fail)?;

                let result = adapter
                    .person_sessions(&primary.person_id)
                    .await
                    .map_err(fail)?;
                expect_eq(scenario, &vec![primary.clone()], &result)
            }

            Scenario::DeletePersonSessions => {
                adapter
                    .delete_person_sessions(&primary.person_id)
                    .await
                    .map_err(&fail)?;
                let result = adapter
                    .person_sessions(&primary.person_id)
                    .await
                    .map_err(fail)?;
                expect_eq(scenario, &Vec::new(), &result)
            }
        }
    }
}

fn adapter_failure(scenario: Scenario) -> impl Fn(anyhow::Error) -> ConformanceError {
    move |source| ConformanceError::Adapter {
        scenario: scenario.name(),
        source,
    }
}

fn expect_eq<T>(scenario: Scenario, expected: &T, actual: &T) -> Result<(), ConformanceError>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        return Ok(());
    }

    Err(ConformanceError::Assertion {
        scenario: scenario.name(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}
