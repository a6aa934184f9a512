use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structural description of a callable offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Capability tag deciding in which ReAct state a function may be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionRole {
    #[serde(rename = "thought")]
    Thought,
    #[serde(rename = "observation")]
    Observation,
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "completion")]
    Completion,
}

impl FunctionRole {
    pub fn is_reserved(self) -> bool {
        matches!(self, Self::Thought | Self::Observation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "user")]
    User { content: String },
    #[serde(rename = "assistant")]
    Assistant { text: String },
    #[serde(rename = "functionCall")]
    FunctionCall { name: String, arguments: Value },
    #[serde(rename = "functionResult")]
    FunctionResult {
        name: String,
        content: Value,
        #[serde(rename = "isError")]
        is_error: bool,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }
}

/// Outcome of a single generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelReply {
    FunctionCall {
        #[serde(rename = "function")]
        name: String,
        #[serde(default = "empty_arguments")]
        arguments: Value,
    },
    Text {
        text: String,
    },
}

impl ModelReply {
    pub fn function_call(name: impl Into<String>, arguments: Value) -> Self {
        Self::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// History entry the session appends for this reply.
    pub fn to_message(&self) -> Message {
        match self {
            Self::FunctionCall { name, arguments } => Message::FunctionCall {
                name: name.clone(),
                arguments: arguments.clone(),
            },
            Self::Text { text } => Message::Assistant { text: text.clone() },
        }
    }
}

fn empty_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Which of the allowed functions the model must pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name")]
pub enum FunctionChoice {
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "named")]
    Named(String),
}
