// SPDX-License-Identifier: MIT

//! Typed error handling for scenario-rs
//!
//! Configuration problems are recoverable at the node that raised them
//! (the node is marked unconfigured and its siblings still build), while
//! parse errors for unknown expression shapes abort the read.

use thiserror::Error;

/// Top-level error type for scenario-rs
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A procedure, intersection or script envelope could not be configured
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A map node carrying none of the known expression keys
    #[error("Unrecognized expression (expected one of All, Any, Not, Sequential, Parallel, Type): {node}")]
    UnrecognizedExpression { node: String },

    /// A scalar or sequence where an expression map is required
    #[error("Unsupported {kind} node where an expression map is required: {node}")]
    UnsupportedNode { kind: &'static str, node: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while configuring a procedure or an intersection
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    /// A required key is absent from the node
    #[error("{context} requires key '{key}': {node}")]
    MissingKey {
        key: String,
        context: String,
        node: String,
    },

    /// A key is present but its value has the wrong shape
    #[error("Invalid value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No condition is registered under the requested name
    #[error("Failed to load procedure '{name}': no condition registered under that name")]
    UnknownCondition { name: String },

    /// A condition rejected its configuration
    #[error("Condition '{name}' failed to configure: {message}")]
    Rejected { name: String, message: String },
}

/// Errors raised while evaluating an expression tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvaluationError {
    /// A procedure whose plugin never configured was evaluated
    #[error("Procedure '{type_name}' is not configured")]
    NotConfigured { type_name: String },
}

impl ScenarioError {
    /// Create an unrecognized-expression error from the offending node
    pub fn unrecognized(node: &serde_yaml::Value) -> Self {
        Self::UnrecognizedExpression {
            node: describe(node),
        }
    }

    /// Create an unsupported-node error from the offending node
    pub fn unsupported(node: &serde_yaml::Value) -> Self {
        let kind = match node {
            serde_yaml::Value::Sequence(_) => "sequence",
            serde_yaml::Value::Mapping(_) => "map",
            serde_yaml::Value::Null => "null",
            serde_yaml::Value::Tagged(_) => "tagged",
            _ => "scalar",
        };
        Self::UnsupportedNode {
            kind,
            node: describe(node),
        }
    }
}

impl ConfigurationError {
    /// Create a missing-key error, rendering the node for diagnostics
    pub fn missing_key(
        key: impl Into<String>,
        context: impl Into<String>,
        node: &serde_yaml::Value,
    ) -> Self {
        Self::MissingKey {
            key: key.into(),
            context: context.into(),
            node: describe(node),
        }
    }

    /// Create an invalid-value error
    pub fn invalid_value(key: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create an error for a condition that rejected its configuration
    pub fn rejected(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Render a YAML node on one line for error messages
pub fn describe(node: &serde_yaml::Value) -> String {
    match serde_json::to_string(node) {
        Ok(text) => text,
        Err(_) => format!("{:?}", node),
    }
}
