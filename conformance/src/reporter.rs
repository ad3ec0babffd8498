use crate::error::ConformanceError;

/// Progress sink for a conformance run.
///
/// Reporters observe the run; they cannot change its outcome.
pub trait Reporter: Send + Sync {
    fn suite_started(&self) {}

    fn scenario_started(&self, _scenario: &'static str) {}

    fn scenario_passed(&self, _scenario: &'static str) {}

    fn scenario_failed(&self, _scenario: &'static str, _error: &ConformanceError) {}

    fn suite_passed(&self) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Emits structured `tracing` events under the `conformance` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn suite_started(&self) {
        tracing::info!(target: "conformance", "running adapter tests");
    }

    fn scenario_started(&self, scenario: &'static str) {
        tracing::debug!(target: "conformance", scenario, "scenario started");
    }

    fn scenario_passed(&self, scenario: &'static str) {
        tracing::info!(target: "conformance", scenario, "scenario passed");
    }

    fn scenario_failed(&self, scenario: &'static str, error: &ConformanceError) {
        tracing::error!(target: "conformance", scenario, error = ?error, "scenario failed");
    }

    fn suite_passed(&self) {
        tracing::info!(target: "conformance", "adapter passed all tests");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn tracing_reporter_logs_lifecycle() {
        let reporter = TracingReporter;
        reporter.suite_started();
        reporter.scenario_passed("delete_session() deletes session");
        reporter.suite_passed();

        assert!(logs_contain("running adapter tests"));
        assert!(logs_contain("scenario passed"));
        assert!(logs_contain("adapter passed all tests"));
    }

    #[test]
    #[traced_test]
    fn tracing_reporter_logs_failure_with_error() {
        let err = ConformanceError::Assertion {
            scenario: "delete_session() deletes session",
            expected: "[]".into(),
            actual: "[session]".into(),
        };

        TracingReporter.scenario_failed(err.scenario(), &err);

        assert!(logs_contain("scenario failed"));
        assert!(logs_contain("Assertion"));
    }
}
