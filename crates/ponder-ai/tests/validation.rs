use ponder_ai::{check_arguments, check_function_call, CallRejection, FunctionDescriptor};
use serde_json::json;

fn population_lookup() -> FunctionDescriptor {
    FunctionDescriptor::new(
        "lookup",
        "Look up a city population",
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string" },
                "year": { "type": "integer", "minimum": 1800 }
            },
            "required": ["city"],
            "additionalProperties": false
        }),
    )
}

#[test]
fn offered_call_with_matching_arguments_returns_its_descriptor() {
    let offered = [population_lookup()];
    let arguments = json!({ "city": "Lisbon", "year": 2020 });
    let descriptor =
        check_function_call(&offered, "lookup", &arguments).expect("call should be accepted");
    assert_eq!(descriptor.name, "lookup");
}

#[test]
fn call_outside_the_offered_set_lists_what_was_offered() {
    let offered = [population_lookup()];
    let rejection = check_function_call(&offered, "recordThought", &json!({ "thought": "x" }))
        .expect_err("recordThought is not offered");
    assert_eq!(
        rejection,
        CallRejection::NotOffered {
            name: "recordThought".to_string(),
            offered: vec!["lookup".to_string()],
        }
    );
    assert_eq!(rejection.to_string(), "'recordThought' is not offered (offered: lookup)");
}

#[test]
fn each_schema_violation_is_reported_with_its_path() {
    let rejection = check_arguments(&population_lookup(), &json!({ "city": 10, "year": 1200 }))
        .expect_err("both fields are wrong");
    let CallRejection::InvalidArguments { name, violations } = &rejection else {
        panic!("unexpected rejection: {rejection}");
    };
    assert_eq!(name, "lookup");
    let paths = violations
        .iter()
        .map(|violation| violation.path.as_str())
        .collect::<Vec<_>>();
    assert!(paths.contains(&"/city"), "paths: {paths:?}");
    assert!(paths.contains(&"/year"), "paths: {paths:?}");
    assert!(rejection
        .to_string()
        .starts_with("arguments for 'lookup' do not match its schema; "));
}

#[test]
fn missing_required_field_is_reported_at_the_root() {
    let rejection =
        check_arguments(&population_lookup(), &json!({})).expect_err("city is required");
    let CallRejection::InvalidArguments { violations, .. } = rejection else {
        panic!("expected argument violations");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "");
}

#[test]
fn uncompilable_schema_is_a_broken_schema_rejection() {
    let mut descriptor = population_lookup();
    descriptor.parameters = json!({ "type": 12 });
    let rejection =
        check_arguments(&descriptor, &json!({})).expect_err("schema should not compile");
    assert!(matches!(rejection, CallRejection::BrokenSchema { ref name, .. } if name == "lookup"));
    assert_eq!(rejection.function_name(), "lookup");
}
