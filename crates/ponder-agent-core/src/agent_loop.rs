use std::sync::Arc;
use std::time::Instant;

use ponder_ai::{
    check_function_call, ChatSession, FunctionChoice, FunctionDescriptor, FunctionRole, Message,
    ModelReply,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::agent::AgentSession;
use crate::error::AgentError;
use crate::registry::{FunctionRegistry, RECORD_OBSERVATION, RECORD_THOUGHT};
use crate::state::{ReactState, ReactStep};
use crate::types::{ReactConfig, ReactEvent, ReactEventSink};

/// Drives an [`AgentSession`] through thought, action and observation steps.
///
/// The driver holds no per-conversation state and can be cloned across sessions.
#[derive(Clone)]
pub struct ReactDriver {
    registry: Arc<FunctionRegistry>,
    config: ReactConfig,
    event_sink: Option<ReactEventSink>,
}

impl ReactDriver {
    pub fn new(registry: Arc<FunctionRegistry>, config: ReactConfig) -> Self {
        Self {
            registry,
            config,
            event_sink: None,
        }
    }

    pub fn with_event_sink(mut self, sink: ReactEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Records `message` as fresh user input and runs turns until the task completes.
    pub async fn submit<C: ChatSession>(
        &self,
        session: &mut AgentSession<C>,
        message: impl Into<String>,
    ) -> Result<(), AgentError> {
        if session.state().is_terminal() {
            return Err(AgentError::invalid_state(
                session.state(),
                "the task is complete; reset the session before submitting new input",
            ));
        }

        session.begin_input();
        session.chat_mut().record(Message::user(message));
        info!(
            max_function_calls = self.config.max_function_calls,
            "react request started"
        );
        self.advance(session).await
    }

    /// Runs steps from the current state until COMPLETE. A no-op on a completed session.
    pub async fn advance<C: ChatSession>(
        &self,
        session: &mut AgentSession<C>,
    ) -> Result<(), AgentError> {
        while let Some(step) = session.state().next_step() {
            if session.function_calls() >= self.config.max_function_calls {
                let limit = self.config.max_function_calls;
                warn!(limit, state = %session.state(), "function call budget exhausted");
                self.emit(ReactEvent::BudgetExhausted {
                    limit,
                    state: session.state(),
                });
                return Err(AgentError::BudgetExhausted {
                    limit,
                    state: session.state(),
                });
            }
            self.run_step(session, step).await?;
        }

        debug!(function_calls = session.function_calls(), "session complete");
        Ok(())
    }

    async fn run_step<C: ChatSession>(
        &self,
        session: &mut AgentSession<C>,
        step: ReactStep,
    ) -> Result<(), AgentError> {
        let target = step.state();
        let allowed = self.registry.select_functions(target)?;
        debug!(
            from = %session.state(),
            to = %target,
            functions = allowed.len(),
            "react step started"
        );
        self.emit(ReactEvent::StepStarted {
            state: target,
            functions: allowed
                .iter()
                .map(|descriptor| descriptor.name.clone())
                .collect(),
        });

        session.chat_mut().set_allowed_functions(allowed.clone());
        let reply = self.generate(session.chat_mut(), step_choice(step)).await?;
        session.count_function_call();

        match reply {
            ModelReply::Text { text } => {
                debug!(state = %session.state(), "model replied with text, nudging");
                self.emit(ReactEvent::TextRejected {
                    state: session.state(),
                    text,
                });
                let nudge = self.config.function_required_message.clone();
                session.chat_mut().record(Message::user(nudge));
                Ok(())
            }
            ModelReply::FunctionCall { name, arguments } => {
                self.invoke(session, target, &allowed, name, arguments).await
            }
        }
    }

    async fn invoke<C: ChatSession>(
        &self,
        session: &mut AgentSession<C>,
        target: ReactState,
        allowed: &[FunctionDescriptor],
        name: String,
        arguments: Value,
    ) -> Result<(), AgentError> {
        check_function_call(allowed, &name, &arguments)?;
        let function = self
            .registry
            .find(&name)
            .ok_or_else(|| not_found(&name, allowed))?;
        let role = function.role();

        let started = Instant::now();
        let outcome = function.handler().call(arguments.clone()).await;
        debug!(
            function = name.as_str(),
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            ok = outcome.is_ok(),
            "function executed"
        );

        let result = match outcome {
            Ok(result) => result,
            Err(source) => {
                session.chat_mut().record(Message::FunctionResult {
                    name: name.clone(),
                    content: json!(source.message),
                    is_error: true,
                });
                return Err(AgentError::FunctionFailed { name, source });
            }
        };

        session.chat_mut().record(Message::FunctionResult {
            name: name.clone(),
            content: result.clone(),
            is_error: false,
        });

        let completed = role == FunctionRole::Completion;
        let next_state = if completed {
            ReactState::Complete
        } else {
            target
        };
        session.commit(next_state, completed);
        self.emit(ReactEvent::FunctionInvoked {
            name,
            arguments,
            result,
            state: next_state,
        });

        if completed {
            info!(function_calls = session.function_calls(), "react task completed");
            self.emit(ReactEvent::Completed {
                function_calls: session.function_calls(),
            });
        }
        Ok(())
    }

    async fn generate<C: ChatSession>(
        &self,
        chat: &mut C,
        choice: FunctionChoice,
    ) -> Result<ModelReply, AgentError> {
        let generation = chat.generate(choice);
        match self.config.generation_timeout() {
            Some(after) => tokio::time::timeout(after, generation)
                .await
                .map_err(|_| AgentError::GenerationTimedOut { after })?
                .map_err(AgentError::Model),
            None => generation.await.map_err(AgentError::Model),
        }
    }

    fn emit(&self, event: ReactEvent) {
        debug!(event = event.kind(), "react event");
        if let Some(sink) = &self.event_sink {
            sink(event);
        }
    }
}

fn step_choice(step: ReactStep) -> FunctionChoice {
    match step {
        ReactStep::Thought => FunctionChoice::Named(RECORD_THOUGHT.to_string()),
        ReactStep::Observe => FunctionChoice::Named(RECORD_OBSERVATION.to_string()),
        ReactStep::Action => FunctionChoice::Any,
    }
}

fn not_found(name: &str, allowed: &[FunctionDescriptor]) -> AgentError {
    AgentError::FunctionNotFound {
        name: name.to_string(),
        available: allowed
            .iter()
            .map(|descriptor| descriptor.name.clone())
            .collect(),
    }
}
