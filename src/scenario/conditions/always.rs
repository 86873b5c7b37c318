// SPDX-License-Identifier: MIT

use crate::scenario::config::read_optional;
use crate::scenario::context::Context;
use crate::scenario::intersection::IntersectionManager;
use crate::sim::condition::Condition;
use crate::sim::error::ConfigurationError;
use serde_yaml::Value;

/// Condition with a constant result, mostly for tests and placeholders
pub struct AlwaysCondition {
    type_name: &'static str,
    name: String,
    result: bool,
}

impl AlwaysCondition {
    fn new(type_name: &'static str, result: bool) -> Self {
        Self {
            type_name,
            name: type_name.to_string(),
            result,
        }
    }

    pub fn always_true() -> Self {
        Self::new("AlwaysTrue", true)
    }

    pub fn always_false() -> Self {
        Self::new("AlwaysFalse", false)
    }
}

impl Condition for AlwaysCondition {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, node: &Value, _context: &Context) -> Result<(), ConfigurationError> {
        self.name = read_optional(node, "Name", self.name.clone())?;
        Ok(())
    }

    fn update(&mut self, _intersections: &mut IntersectionManager) -> bool {
        self.result
    }
}
