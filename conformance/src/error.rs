use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConformanceError {
    /// The adapter answered, but not with what the contract requires.
    #[error("{scenario}: expected {expected}, got {actual}")]
    Assertion {
        scenario: &'static str,
        expected: String,
        actual: String,
    },

    /// The adapter call itself failed; its error is kept as the source.
    #[error("{scenario}: adapter call failed")]
    Adapter {
        scenario: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ConformanceError {
    pub fn scenario(&self) -> &'static str {
        match self {
            Self::Assertion { scenario, .. } | Self::Adapter { scenario, .. } => scenario,
        }
    }
}
