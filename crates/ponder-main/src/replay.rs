use std::fs;
use std::path::Path;
use std::sync::Arc;

use ponder_agent_core::{
    constant_handler, AgentFunction, FunctionFuture, FunctionHandlerRef, FunctionRegistry,
    ReactAgent, ReactConfig, ReactEvent, ReactEventSink,
};
use ponder_ai::{ModelReply, ScriptedChatSession};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// A recorded model transcript plus the domain functions it calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default, rename = "function")]
    pub functions: Vec<ScriptFunction>,
    #[serde(default)]
    pub complete: Option<ScriptCompletion>,
    #[serde(default, rename = "reply")]
    pub replies: Vec<ModelReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFunction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_parameters")]
    pub parameters: Value,
    /// Canned result; the function echoes its arguments when absent.
    #[serde(default)]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptCompletion {
    pub result: Value,
}

fn default_parameters() -> Value {
    json!({ "type": "object" })
}

impl ReplayScript {
    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|error| format!("parse replay script failed: {error}"))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read {} failed: {error}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn registry(&self) -> Result<FunctionRegistry, String> {
        let mut builder = FunctionRegistry::builder()
            .functions(self.functions.iter().map(ScriptFunction::to_agent_function));
        if let Some(complete) = &self.complete {
            builder = builder.on_complete(constant_handler(complete.result.clone()));
        }
        builder.build().map_err(|error| error.to_string())
    }
}

impl ScriptFunction {
    fn to_agent_function(&self) -> AgentFunction {
        let handler: FunctionHandlerRef = match &self.result {
            Some(result) => constant_handler(result.clone()),
            None => Arc::new(|arguments: Value| -> FunctionFuture {
                Box::pin(async move { Ok(arguments) })
            }),
        };
        AgentFunction::new(
            self.name.clone(),
            self.description.clone(),
            self.parameters.clone(),
            handler,
        )
    }
}

/// Replays `script` against `message` and prints each state transition to stdout.
pub async fn run_replay(
    script: ReplayScript,
    config: ReactConfig,
    message: &str,
) -> Result<(), String> {
    let registry = script.registry()?;
    let registered = registry
        .descriptors()
        .into_iter()
        .map(|descriptor| descriptor.name)
        .collect::<Vec<_>>();
    info!(?registered, replies = script.replies.len(), "replay started");
    let chat = ScriptedChatSession::new(script.replies);

    let sink: ReactEventSink = Arc::new(|event: ReactEvent| println!("{}", format_event(&event)));
    let mut agent = ReactAgent::new(registry, config, chat).with_event_sink(sink);

    let outcome = agent.submit(message).await;
    println!("state: {}", agent.state());
    println!("function calls: {}", agent.function_calls());
    println!("complete: {}", agent.is_complete());
    println!("unused replies: {}", agent.session().chat().remaining_replies());
    outcome.map_err(|error| error.to_string())
}

fn format_event(event: &ReactEvent) -> String {
    match event {
        ReactEvent::StepStarted { state, functions } => {
            format!("[{state}] offering: {}", functions.join(", "))
        }
        ReactEvent::FunctionInvoked {
            name,
            arguments,
            result,
            state,
        } => format!("[{state}] {name}({arguments}) -> {result}"),
        ReactEvent::TextRejected { state, text } => format!("[{state}] text rejected: {text}"),
        ReactEvent::Completed { function_calls } => {
            format!("completed after {function_calls} function calls")
        }
        ReactEvent::BudgetExhausted { limit, state } => {
            format!("[{state}] budget of {limit} function calls exhausted")
        }
    }
}
