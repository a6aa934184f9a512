use std::time::Duration;

use ponder_ai::{CallRejection, FunctionRole, PonderAiError};
use thiserror::Error;

use crate::state::ReactState;

/// Failures surfaced by the ReAct driver. None of them are retried internally.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid agent state {state}: {reason}")]
    InvalidState { state: String, reason: String },

    #[error("function call budget of {limit} exhausted in state {state}")]
    BudgetExhausted { limit: usize, state: ReactState },

    #[error("function '{name}' is not available (allowed: {})", .available.join(", "))]
    FunctionNotFound { name: String, available: Vec<String> },

    #[error("function call rejected: {0}")]
    InvalidArguments(#[source] CallRejection),

    #[error("function '{name}' failed: {source}")]
    FunctionFailed {
        name: String,
        #[source]
        source: PonderAiError,
    },

    #[error("model generation failed: {0}")]
    Model(#[source] PonderAiError),

    #[error("model generation timed out after {after:?}")]
    GenerationTimedOut { after: Duration },

    #[error("function '{0}' is registered more than once")]
    DuplicateFunction(String),

    #[error("function '{name}' cannot be registered with the {role:?} role")]
    RoleNotAllowed { name: String, role: FunctionRole },
}

impl From<CallRejection> for AgentError {
    fn from(rejection: CallRejection) -> Self {
        match rejection {
            CallRejection::NotOffered { name, offered } => Self::FunctionNotFound {
                name,
                available: offered,
            },
            other => Self::InvalidArguments(other),
        }
    }
}

impl AgentError {
    pub(crate) fn invalid_state(state: ReactState, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            state: state.to_string(),
            reason: reason.into(),
        }
    }
}
