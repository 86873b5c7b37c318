// SPDX-License-Identifier: MIT

//! Typed access to keys of a script node

use crate::sim::error::ConfigurationError;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

/// Read `key` from `node`, failing when it is absent or mistyped
pub fn read_required<T: DeserializeOwned>(
    node: &Value,
    key: &str,
    context: &str,
) -> Result<T, ConfigurationError> {
    match node.get(key) {
        Some(value) => serde_yaml::from_value(value.clone())
            .map_err(|e| ConfigurationError::invalid_value(key, e)),
        None => Err(ConfigurationError::missing_key(key, context, node)),
    }
}

/// Read `key` from `node`, using `default` when it is absent
pub fn read_optional<T: DeserializeOwned>(
    node: &Value,
    key: &str,
    default: T,
) -> Result<T, ConfigurationError> {
    match node.get(key) {
        Some(value) => serde_yaml::from_value(value.clone())
            .map_err(|e| ConfigurationError::invalid_value(key, e)),
        None => Ok(default),
    }
}
