pub mod error;
pub mod id;
pub mod reporter;
pub mod suite;

pub use error::ConformanceError;
pub use id::{IdGenerator, RandomIdGenerator, SequenceIdGenerator};
pub use reporter::{NoopReporter, Reporter, TracingReporter};
pub use suite::{AdapterTestSuite, Scenario, fixture_person, test_adapter};
