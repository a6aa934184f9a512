//! ReAct state machine built on top of `ponder-ai`.

mod agent;
mod agent_loop;
mod error;
mod registry;
mod state;
mod types;

pub use agent::{AgentSession, ReactAgent};
pub use agent_loop::ReactDriver;
pub use error::AgentError;
pub use registry::{
    FunctionRegistry, FunctionRegistryBuilder, COMPLETE_TASK, RECORD_OBSERVATION, RECORD_THOUGHT,
};
pub use state::ReactState;
pub use types::{
    constant_handler, AgentFunction, FunctionFuture, FunctionHandler, FunctionHandlerRef,
    ReactConfig, ReactEvent, ReactEventSink,
};
