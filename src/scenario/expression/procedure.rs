// SPDX-License-Identifier: MIT

//! Procedure leaves backed by registered conditions

use crate::scenario::context::Context;
use crate::scenario::intersection::IntersectionManager;
use crate::scenario::registry::CONDITION_SUFFIX;
use crate::sim::condition::Condition;
use crate::sim::error::{ConfigurationError, EvaluationError};
use serde_yaml::Value;
use std::cell::RefCell;

/// Shown in place of a type when the script gives none
const TYPE_UNSPECIFIED: &str = "(type unspecified)";

/// A condition plugin resolved from the script `Type`.
///
/// Resolution or configuration failures never escape the constructor: the
/// procedure is kept, marked unconfigured, and refuses to evaluate.
pub struct Procedure {
    type_name: String,
    plugin: Option<RefCell<Box<dyn Condition>>>,
    configured: bool,
    error: Option<ConfigurationError>,
}

impl Procedure {
    /// Resolve `<Type>Condition` in the context registry and configure it
    pub fn new(node: &Value, context: &Context) -> Self {
        let type_name = match node.get("Type") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => TYPE_UNSPECIFIED.to_string(),
        };

        let key = format!("{}{}", type_name, CONDITION_SUFFIX);
        match context.conditions().create(&key) {
            Some(plugin) => Self::configure(type_name, plugin, node, context),
            None => {
                let error = ConfigurationError::UnknownCondition { name: key };
                log::error!("{}", error);
                Self {
                    type_name,
                    plugin: None,
                    configured: false,
                    error: Some(error),
                }
            }
        }
    }

    /// Configure an already created plugin against `node`
    pub fn configure(
        type_name: impl Into<String>,
        mut plugin: Box<dyn Condition>,
        node: &Value,
        context: &Context,
    ) -> Self {
        let type_name = type_name.into();
        let error = match plugin.configure(node, context) {
            Ok(()) => {
                log::debug!("Configured {} ({})", type_name, plugin.name());
                None
            }
            Err(e) => {
                log::error!("{}", e);
                Some(e)
            }
        };

        Self {
            type_name,
            configured: error.is_none(),
            plugin: Some(RefCell::new(plugin)),
            error,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Script name of the plugin, if one was resolved
    pub fn name(&self) -> Option<String> {
        self.plugin
            .as_ref()
            .map(|plugin| plugin.borrow().name().to_string())
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Why construction failed, if it did
    pub fn error(&self) -> Option<&ConfigurationError> {
        self.error.as_ref()
    }

    pub(crate) fn call(
        &self,
        intersections: &mut IntersectionManager,
    ) -> Result<bool, EvaluationError> {
        match &self.plugin {
            Some(plugin) if self.configured => Ok(plugin.borrow_mut().update(intersections)),
            _ => Err(EvaluationError::NotConfigured {
                type_name: self.type_name.clone(),
            }),
        }
    }
}
