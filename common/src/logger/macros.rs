use tracing::{Level, Span};

use super::TraceId;

/// Create a root span for one conformance run
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "run",
        name = %name,
        trace_id = %trace_id.as_str()
    )
}

/// Create a child span for a single scenario (inherits trace_id from the root)
pub fn scenario_span(index: usize, scenario: &'static str) -> Span {
    tracing::span!(Level::INFO, "scenario", index, scenario = %scenario)
}
