use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactState {
    #[default]
    Input,
    Thought,
    Action,
    Observe,
    Complete,
}

impl ReactState {
    pub const ALL: [ReactState; 5] = [
        Self::Input,
        Self::Thought,
        Self::Action,
        Self::Observe,
        Self::Complete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Thought => "THOUGHT",
            Self::Action => "ACTION",
            Self::Observe => "OBSERVE",
            Self::Complete => "COMPLETE",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// The step that runs next from this state, `None` once complete.
    pub(crate) fn next_step(self) -> Option<ReactStep> {
        match self {
            Self::Input | Self::Observe => Some(ReactStep::Thought),
            Self::Thought => Some(ReactStep::Action),
            Self::Action => Some(ReactStep::Observe),
            Self::Complete => None,
        }
    }
}

impl Display for ReactState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactState {
    type Err = AgentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| AgentError::InvalidState {
                state: value.to_string(),
                reason: "unknown state; the session must be reset before it is asked anything else"
                    .to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReactStep {
    Thought,
    Action,
    Observe,
}

impl ReactStep {
    /// State committed once the step's function call has executed.
    pub(crate) fn state(self) -> ReactState {
        match self {
            Self::Thought => ReactState::Thought,
            Self::Action => ReactState::Action,
            Self::Observe => ReactState::Observe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_thought_action_observe_cycle() {
        assert_eq!(ReactState::Input.next_step(), Some(ReactStep::Thought));
        assert_eq!(ReactState::Thought.next_step(), Some(ReactStep::Action));
        assert_eq!(ReactState::Action.next_step(), Some(ReactStep::Observe));
        assert_eq!(ReactState::Observe.next_step(), Some(ReactStep::Thought));
        assert_eq!(ReactState::Complete.next_step(), None);
    }

    #[test]
    fn labels_round_trip_and_unknown_labels_are_invalid_state() {
        for state in ReactState::ALL {
            assert_eq!(state.as_str().parse::<ReactState>().ok(), Some(state));
        }

        let error = "DREAMING"
            .parse::<ReactState>()
            .expect_err("unknown label should fail");
        assert!(matches!(
            error,
            AgentError::InvalidState { ref state, .. } if state == "DREAMING"
        ));
    }

    #[test]
    fn serde_uses_upper_case_labels() {
        let value = serde_json::to_value(ReactState::Observe).expect("serialize state");
        assert_eq!(value, serde_json::json!("OBSERVE"));
    }
}
