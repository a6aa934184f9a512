use std::fmt::{Display, Formatter};

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::types::FunctionDescriptor;

/// One schema violation inside a call's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentViolation {
    /// JSON pointer into the arguments, empty for the root.
    pub path: String,
    pub message: String,
}

/// Reason a model's function call is refused before any handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRejection {
    /// The name is not among the functions offered for this step.
    NotOffered { name: String, offered: Vec<String> },
    /// The descriptor's own parameter schema does not compile.
    BrokenSchema { name: String, reason: String },
    InvalidArguments {
        name: String,
        violations: Vec<ArgumentViolation>,
    },
}

impl CallRejection {
    pub fn function_name(&self) -> &str {
        match self {
            Self::NotOffered { name, .. }
            | Self::BrokenSchema { name, .. }
            | Self::InvalidArguments { name, .. } => name,
        }
    }
}

impl Display for CallRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOffered { name, offered } => {
                write!(f, "'{name}' is not offered (offered: {})", offered.join(", "))
            }
            Self::BrokenSchema { name, reason } => {
                write!(f, "parameter schema of '{name}' does not compile: {reason}")
            }
            Self::InvalidArguments { name, violations } => {
                write!(f, "arguments for '{name}' do not match its schema")?;
                for violation in violations {
                    let path = if violation.path.is_empty() {
                        "/"
                    } else {
                        violation.path.as_str()
                    };
                    write!(f, "; {path}: {}", violation.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CallRejection {}

/// Accepts a call only if `name` is offered and `arguments` satisfy its schema.
pub fn check_function_call<'a>(
    offered: &'a [FunctionDescriptor],
    name: &str,
    arguments: &Value,
) -> Result<&'a FunctionDescriptor, CallRejection> {
    let descriptor = offered
        .iter()
        .find(|descriptor| descriptor.name == name)
        .ok_or_else(|| CallRejection::NotOffered {
            name: name.to_string(),
            offered: offered
                .iter()
                .map(|descriptor| descriptor.name.clone())
                .collect(),
        })?;
    check_arguments(descriptor, arguments)?;
    Ok(descriptor)
}

pub fn check_arguments(
    descriptor: &FunctionDescriptor,
    arguments: &Value,
) -> Result<(), CallRejection> {
    let schema = JSONSchema::compile(&descriptor.parameters).map_err(|error| {
        CallRejection::BrokenSchema {
            name: descriptor.name.clone(),
            reason: error.to_string(),
        }
    })?;

    if let Err(errors) = schema.validate(arguments) {
        let violations = errors
            .map(|error| ArgumentViolation {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();
        return Err(CallRejection::InvalidArguments {
            name: descriptor.name.clone(),
            violations,
        });
    }

    Ok(())
}
