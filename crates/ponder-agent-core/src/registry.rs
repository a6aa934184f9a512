use std::collections::HashSet;

use ponder_ai::{FunctionDescriptor, FunctionRole};
use serde_json::{json, Value};

use crate::error::AgentError;
use crate::state::ReactState;
use crate::types::{constant_handler, AgentFunction, FunctionHandlerRef};

pub const RECORD_THOUGHT: &str = "recordThought";
pub const RECORD_OBSERVATION: &str = "recordObservation";
pub const COMPLETE_TASK: &str = "completeTask";

/// Every callable a ReAct agent exposes, in registration order.
///
/// The thought and observation recorders come first, then domain actions, then the
/// completion function.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: Vec<AgentFunction>,
}

impl FunctionRegistry {
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }

    /// Functions the model may call while the agent is in `state`.
    pub fn select_functions(
        &self,
        state: ReactState,
    ) -> Result<Vec<FunctionDescriptor>, AgentError> {
        let accepts: fn(FunctionRole) -> bool = match state {
            ReactState::Input | ReactState::Thought => |role| role == FunctionRole::Thought,
            ReactState::Observe => |role| role == FunctionRole::Observation,
            ReactState::Action => |role| !role.is_reserved(),
            ReactState::Complete => {
                return Err(AgentError::invalid_state(
                    state,
                    "no functions are offered once the task is complete; reset the session first",
                ));
            }
        };

        Ok(self
            .functions
            .iter()
            .filter(|function| accepts(function.role()))
            .map(|function| function.descriptor().clone())
            .collect())
    }

    pub fn find(&self, name: &str) -> Option<&AgentFunction> {
        self.functions.iter().find(|function| function.name() == name)
    }

    /// Every registered descriptor, reserved ones included, in registration order.
    pub fn descriptors(&self) -> Vec<FunctionDescriptor> {
        self.functions
            .iter()
            .map(|function| function.descriptor().clone())
            .collect()
    }
}

#[derive(Default)]
pub struct FunctionRegistryBuilder {
    actions: Vec<AgentFunction>,
    on_complete: Option<FunctionHandlerRef>,
}

impl FunctionRegistryBuilder {
    pub fn function(mut self, function: AgentFunction) -> Self {
        self.actions.push(function);
        self
    }

    pub fn functions(mut self, functions: impl IntoIterator<Item = AgentFunction>) -> Self {
        self.actions.extend(functions);
        self
    }

    /// Side effect run when the model calls `completeTask`. Its return value is recorded
    /// as the function result.
    pub fn on_complete(mut self, handler: FunctionHandlerRef) -> Self {
        self.on_complete = Some(handler);
        self
    }

    /// Fails on a name registered twice, including a domain function that reuses a
    /// reserved name, and on any domain function carrying a reserved or completion role.
    pub fn build(self) -> Result<FunctionRegistry, AgentError> {
        if let Some(function) = self
            .actions
            .iter()
            .find(|function| function.role() != FunctionRole::Action)
        {
            return Err(AgentError::RoleNotAllowed {
                name: function.name().to_string(),
                role: function.role(),
            });
        }

        let mut functions = Vec::with_capacity(self.actions.len() + 3);
        functions.push(record_thought());
        functions.push(record_observation());
        functions.extend(self.actions);
        functions.push(complete_task(
            self.on_complete
                .unwrap_or_else(|| constant_handler(json!("finished"))),
        ));

        let mut seen = HashSet::new();
        for function in &functions {
            if !seen.insert(function.name().to_string()) {
                return Err(AgentError::DuplicateFunction(function.name().to_string()));
            }
        }

        Ok(FunctionRegistry { functions })
    }
}

fn record_thought() -> AgentFunction {
    AgentFunction::with_role(
        FunctionRole::Thought,
        FunctionDescriptor::new(
            RECORD_THOUGHT,
            "Record a thought based on the last message",
            single_string_parameter("thought"),
        ),
        constant_handler(json!("recorded")),
    )
}

fn record_observation() -> AgentFunction {
    AgentFunction::with_role(
        FunctionRole::Observation,
        FunctionDescriptor::new(
            RECORD_OBSERVATION,
            "Record an observation based on the last message",
            single_string_parameter("observation"),
        ),
        constant_handler(json!("recorded")),
    )
}

fn complete_task(handler: FunctionHandlerRef) -> AgentFunction {
    AgentFunction::with_role(
        FunctionRole::Completion,
        FunctionDescriptor::new(
            COMPLETE_TASK,
            "Call this once all tasks have been completed to give a final answer",
            json!({ "type": "object", "properties": {} }),
        ),
        handler,
    )
}

fn single_string_parameter(name: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": "string" }
        },
        "required": [name]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> AgentFunction {
        AgentFunction::new(
            "lookup",
            "Look something up",
            json!({ "type": "object" }),
            constant_handler(json!("found")),
        )
    }

    #[test]
    fn build_places_reserved_functions_around_domain_actions() {
        let registry = FunctionRegistry::builder()
            .function(lookup())
            .build()
            .expect("registry should build");
        let registered = registry
            .descriptors()
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect::<Vec<_>>();
        assert_eq!(
            registered,
            vec![RECORD_THOUGHT, RECORD_OBSERVATION, "lookup", COMPLETE_TASK]
        );
    }

    #[test]
    fn build_rejects_domain_function_shadowing_reserved_name() {
        let shadow = AgentFunction::new(
            RECORD_THOUGHT,
            "Pretend to think",
            json!({ "type": "object" }),
            constant_handler(json!("no")),
        );
        let error = FunctionRegistry::builder()
            .function(shadow)
            .build()
            .err()
            .expect("duplicate name should fail");
        assert!(matches!(error, AgentError::DuplicateFunction(name) if name == RECORD_THOUGHT));
    }

    #[test]
    fn select_functions_for_complete_is_invalid_state() {
        let registry = FunctionRegistry::builder().build().expect("registry should build");
        let error = registry
            .select_functions(ReactState::Complete)
            .expect_err("complete state offers nothing");
        assert!(matches!(error, AgentError::InvalidState { ref state, .. } if state == "COMPLETE"));
    }

    #[test]
    fn record_thought_schema_requires_thought_string() {
        let registry = FunctionRegistry::builder().build().expect("registry should build");
        let thought = registry.find(RECORD_THOUGHT).expect("recordThought registered");
        assert_eq!(thought.descriptor().parameters["required"], json!(["thought"]));
        assert_eq!(thought.role(), FunctionRole::Thought);
    }

    #[test]
    fn build_rejects_domain_functions_with_reserved_roles() {
        for role in [
            FunctionRole::Thought,
            FunctionRole::Observation,
            FunctionRole::Completion,
        ] {
            let impostor = AgentFunction::with_role(
                role,
                FunctionDescriptor::new("finishEarly", "Skip ahead", json!({ "type": "object" })),
                constant_handler(json!("done")),
            );
            let error = FunctionRegistry::builder()
                .function(lookup())
                .function(impostor)
                .build()
                .err()
                .expect("reserved role should be refused");
            assert!(matches!(
                error,
                AgentError::RoleNotAllowed { ref name, role: rejected }
                    if name == "finishEarly" && rejected == role
            ));
        }
    }

    #[test]
    fn only_completion_role_belongs_to_complete_task() {
        let registry = FunctionRegistry::builder()
            .function(lookup())
            .build()
            .expect("registry should build");
        let completions = registry
            .functions
            .iter()
            .filter(|function| function.role() == FunctionRole::Completion)
            .map(AgentFunction::name)
            .collect::<Vec<_>>();
        assert_eq!(completions, vec![COMPLETE_TASK]);
    }
}
