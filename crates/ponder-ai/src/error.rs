use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Why a chat session or a function handler could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PonderAiErrorCode {
    /// The session has nothing more to say (scripted replies ran out).
    ScriptExhausted,
    /// The model backend failed to answer.
    GenerationFailed,
    /// A function handler reported a failure.
    FunctionExecutionFailed,
}

impl PonderAiErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScriptExhausted => "script_exhausted",
            Self::GenerationFailed => "generation_failed",
            Self::FunctionExecutionFailed => "function_execution_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PonderAiError {
    pub code: PonderAiErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl PonderAiError {
    pub fn new(code: PonderAiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn script_exhausted(served: usize) -> Self {
        Self::new(
            PonderAiErrorCode::ScriptExhausted,
            format!("no scripted replies left after {served} generations"),
        )
        .with_details(json!({ "served": served }))
    }

    pub fn function_failed(message: impl Into<String>) -> Self {
        Self::new(PonderAiErrorCode::FunctionExecutionFailed, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl Display for PonderAiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code.as_str())
    }
}

impl std::error::Error for PonderAiError {}
