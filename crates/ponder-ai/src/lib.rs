//! Model-facing types for function-calling chat sessions.

mod error;
mod session;
mod types;
mod validation;

pub use error::{PonderAiError, PonderAiErrorCode};
pub use session::{ChatSession, ScriptedChatSession};
pub use types::{FunctionChoice, FunctionDescriptor, FunctionRole, Message, ModelReply};
pub use validation::{check_arguments, check_function_call, ArgumentViolation, CallRejection};
