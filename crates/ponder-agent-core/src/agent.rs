use std::sync::Arc;

use ponder_ai::{ChatSession, Message};

use crate::agent_loop::ReactDriver;
use crate::error::AgentError;
use crate::registry::FunctionRegistry;
use crate::state::ReactState;
use crate::types::{ReactConfig, ReactEventSink};

/// Per-conversation ReAct state. Owns the chat session and is only ever driven through
/// `&mut`, so one conversation cannot have two turns in flight.
#[derive(Debug)]
pub struct AgentSession<C> {
    state: ReactState,
    function_calls: usize,
    completed: bool,
    chat: C,
}

impl<C: ChatSession> AgentSession<C> {
    pub fn new(chat: C) -> Self {
        Self {
            state: ReactState::Input,
            function_calls: 0,
            completed: false,
            chat,
        }
    }

    pub fn state(&self) -> ReactState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Model-driven calls since the last user input.
    pub fn function_calls(&self) -> usize {
        self.function_calls
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut C {
        &mut self.chat
    }

    pub fn history(&self) -> &[Message] {
        self.chat.history()
    }

    /// Returns to INPUT and clears the completion flag and call budget. History is kept.
    pub fn reset(&mut self) {
        self.state = ReactState::Input;
        self.completed = false;
        self.function_calls = 0;
    }

    pub(crate) fn begin_input(&mut self) {
        self.reset();
    }

    pub(crate) fn count_function_call(&mut self) {
        self.function_calls = self.function_calls.saturating_add(1);
    }

    pub(crate) fn commit(&mut self, state: ReactState, completed: bool) {
        self.state = state;
        self.completed = completed;
    }
}

/// A ReAct agent bound to one conversation.
pub struct ReactAgent<C> {
    driver: ReactDriver,
    session: AgentSession<C>,
}

impl<C: ChatSession> ReactAgent<C> {
    pub fn new(registry: FunctionRegistry, config: ReactConfig, chat: C) -> Self {
        Self::with_driver(ReactDriver::new(Arc::new(registry), config), chat)
    }

    pub fn with_driver(driver: ReactDriver, chat: C) -> Self {
        Self {
            driver,
            session: AgentSession::new(chat),
        }
    }

    pub fn with_event_sink(mut self, sink: ReactEventSink) -> Self {
        self.driver = self.driver.with_event_sink(sink);
        self
    }

    pub async fn submit(&mut self, message: impl Into<String>) -> Result<(), AgentError> {
        self.driver.submit(&mut self.session, message).await
    }

    pub async fn advance(&mut self) -> Result<(), AgentError> {
        self.driver.advance(&mut self.session).await
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn state(&self) -> ReactState {
        self.session.state()
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    pub fn function_calls(&self) -> usize {
        self.session.function_calls()
    }

    pub fn history(&self) -> &[Message] {
        self.session.history()
    }

    pub fn session(&self) -> &AgentSession<C> {
        &self.session
    }
}
