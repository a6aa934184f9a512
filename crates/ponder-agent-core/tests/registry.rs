use std::collections::BTreeSet;

use ponder_agent_core::{
    constant_handler, AgentError, AgentFunction, FunctionRegistry, ReactState, COMPLETE_TASK,
    RECORD_OBSERVATION, RECORD_THOUGHT,
};
use proptest::prelude::*;
use serde_json::json;

fn domain_function(name: &str) -> AgentFunction {
    AgentFunction::new(
        name,
        format!("Domain action {name}"),
        json!({ "type": "object" }),
        constant_handler(json!("ok")),
    )
}

fn registry_with(names: &[String]) -> FunctionRegistry {
    FunctionRegistry::builder()
        .functions(names.iter().map(|name| domain_function(name)))
        .build()
        .expect("registry should build")
}

fn selected_names(registry: &FunctionRegistry, state: ReactState) -> Vec<String> {
    registry
        .select_functions(state)
        .expect("state offers functions")
        .into_iter()
        .map(|descriptor| descriptor.name)
        .collect()
}

fn arb_domain_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-zA-Z]{2,12}", 0..8).prop_map(|names: BTreeSet<String>| {
        names
            .into_iter()
            .filter(|name| {
                name != RECORD_THOUGHT && name != RECORD_OBSERVATION && name != COMPLETE_TASK
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn input_and_thought_offer_only_record_thought(names in arb_domain_names()) {
        let registry = registry_with(&names);
        for state in [ReactState::Input, ReactState::Thought] {
            prop_assert_eq!(selected_names(&registry, state), vec![RECORD_THOUGHT.to_string()]);
        }
    }

    #[test]
    fn observe_offers_only_record_observation(names in arb_domain_names()) {
        let registry = registry_with(&names);
        prop_assert_eq!(
            selected_names(&registry, ReactState::Observe),
            vec![RECORD_OBSERVATION.to_string()]
        );
    }

    #[test]
    fn action_offers_domain_set_in_registration_order_without_reserved(
        names in arb_domain_names().prop_shuffle()
    ) {
        let registry = registry_with(&names);
        let selected = selected_names(&registry, ReactState::Action);

        let mut expected = names.clone();
        expected.push(COMPLETE_TASK.to_string());
        prop_assert_eq!(&selected, &expected);
        prop_assert!(!selected.iter().any(|name| name == RECORD_THOUGHT));
        prop_assert!(!selected.iter().any(|name| name == RECORD_OBSERVATION));
    }

    #[test]
    fn complete_never_offers_functions(names in arb_domain_names()) {
        let registry = registry_with(&names);
        let is_invalid_state = matches!(
            registry.select_functions(ReactState::Complete),
            Err(AgentError::InvalidState { .. })
        );
        prop_assert!(is_invalid_state);
    }

    #[test]
    fn selection_is_stable_across_repeated_queries(names in arb_domain_names()) {
        let registry = registry_with(&names);
        let offering = [
            ReactState::Input,
            ReactState::Thought,
            ReactState::Action,
            ReactState::Observe,
        ];
        for state in offering {
            prop_assert_eq!(selected_names(&registry, state), selected_names(&registry, state));
        }
    }
}
