use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PonderAiError;
use crate::types::{FunctionChoice, FunctionDescriptor, Message, ModelReply};

/// Conversation with a chat model that can be restricted to a set of callable functions.
///
/// Implementations own the history. `generate` must append the model's reply to it before
/// returning, and must leave history untouched when it fails.
#[async_trait]
pub trait ChatSession: Send {
    fn set_allowed_functions(&mut self, functions: Vec<FunctionDescriptor>);

    async fn generate(&mut self, choice: FunctionChoice) -> Result<ModelReply, PonderAiError>;

    fn record(&mut self, message: Message);

    fn history(&self) -> &[Message];
}

/// Replays a fixed queue of model replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChatSession {
    replies: VecDeque<ModelReply>,
    history: Vec<Message>,
    allowed_history: Vec<Vec<String>>,
    choices: Vec<FunctionChoice>,
}

impl ScriptedChatSession {
    pub fn new(replies: impl IntoIterator<Item = ModelReply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }

    /// Names passed to every `set_allowed_functions` call, oldest first.
    pub fn allowed_history(&self) -> &[Vec<String>] {
        &self.allowed_history
    }

    pub fn choices(&self) -> &[FunctionChoice] {
        &self.choices
    }
}

#[async_trait]
impl ChatSession for ScriptedChatSession {
    fn set_allowed_functions(&mut self, functions: Vec<FunctionDescriptor>) {
        self.allowed_history.push(
            functions
                .into_iter()
                .map(|function| function.name)
                .collect(),
        );
    }

    async fn generate(&mut self, choice: FunctionChoice) -> Result<ModelReply, PonderAiError> {
        let Some(reply) = self.replies.pop_front() else {
            return Err(PonderAiError::script_exhausted(self.choices.len()));
        };
        debug!(?choice, ?reply, "scripted reply");
        self.choices.push(choice);
        self.history.push(reply.to_message());
        Ok(reply)
    }

    fn record(&mut self, message: Message) {
        self.history.push(message);
    }

    fn history(&self) -> &[Message] {
        &self.history
    }
}
