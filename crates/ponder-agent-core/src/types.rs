use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ponder_ai::{FunctionDescriptor, FunctionRole, PonderAiError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::ReactState;

pub type FunctionFuture = Pin<Box<dyn Future<Output = Result<Value, PonderAiError>> + Send>>;

#[async_trait]
pub trait FunctionHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> Result<Value, PonderAiError>;
}

#[async_trait]
impl<F> FunctionHandler for F
where
    F: Fn(Value) -> FunctionFuture + Send + Sync + 'static,
{
    async fn call(&self, arguments: Value) -> Result<Value, PonderAiError> {
        (self)(arguments).await
    }
}

pub type FunctionHandlerRef = Arc<dyn FunctionHandler>;

/// Handler that ignores its arguments and always returns `value`.
pub fn constant_handler(value: Value) -> FunctionHandlerRef {
    Arc::new(move |_arguments: Value| -> FunctionFuture {
        let value = value.clone();
        Box::pin(async move { Ok(value) })
    })
}

/// A callable exposed to the model: its descriptor, the state it belongs to, and its handler.
///
/// Only the registry creates reserved roles; [`AgentFunction::new`] always yields an action.
#[derive(Clone)]
pub struct AgentFunction {
    descriptor: FunctionDescriptor,
    role: FunctionRole,
    handler: FunctionHandlerRef,
}

impl AgentFunction {
    /// Registers a domain action, offered to the model only in the ACTION state.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: FunctionHandlerRef,
    ) -> Self {
        Self::with_role(
            FunctionRole::Action,
            FunctionDescriptor::new(name, description, parameters),
            handler,
        )
    }

    pub(crate) fn with_role(
        role: FunctionRole,
        descriptor: FunctionDescriptor,
        handler: FunctionHandlerRef,
    ) -> Self {
        Self {
            descriptor,
            role,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    pub fn role(&self) -> FunctionRole {
        self.role
    }

    pub(crate) fn handler(&self) -> &FunctionHandlerRef {
        &self.handler
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactConfig {
    /// Model-driven calls allowed between two user inputs.
    pub max_function_calls: usize,
    /// Nudge recorded when the model answers in text instead of calling a function.
    pub function_required_message: String,
    pub generation_timeout_ms: Option<u64>,
}

impl ReactConfig {
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_function_calls: 20,
            function_required_message: "You must call one of the provided functions.".to_string(),
            generation_timeout_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReactEvent {
    StepStarted {
        state: ReactState,
        functions: Vec<String>,
    },
    FunctionInvoked {
        name: String,
        arguments: Value,
        result: Value,
        state: ReactState,
    },
    TextRejected {
        state: ReactState,
        text: String,
    },
    Completed {
        function_calls: usize,
    },
    BudgetExhausted {
        limit: usize,
        state: ReactState,
    },
}

impl ReactEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StepStarted { .. } => "step_started",
            Self::FunctionInvoked { .. } => "function_invoked",
            Self::TextRejected { .. } => "text_rejected",
            Self::Completed { .. } => "completed",
            Self::BudgetExhausted { .. } => "budget_exhausted",
        }
    }
}

pub type ReactEventSink = Arc<dyn Fn(ReactEvent) + Send + Sync>;
