//! Error types for scenario runs.

use fieldgraph_mutation::MutationError;
use thiserror::Error;

/// Scenario failures, each naming the step at fault.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("step '{step}': expected {expected}, but the mutation succeeded")]
    UnexpectedSuccess { step: String, expected: String },

    #[error("step '{step}': unexpected error: {error}")]
    UnexpectedError { step: String, error: MutationError },

    #[error("step '{step}': assertion failed: {message}")]
    AssertionFailed { step: String, message: String },

    #[error("step '{step}': invariant violated: {message}")]
    InvariantViolated { step: String, message: String },
}

impl ScenarioError {
    pub fn unexpected_success(step: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnexpectedSuccess {
            step: step.into(),
            expected: expected.into(),
        }
    }

    pub fn unexpected_error(step: impl Into<String>, error: MutationError) -> Self {
        Self::UnexpectedError {
            step: step.into(),
            error,
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn invariant_violated(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolated {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
