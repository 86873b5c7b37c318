// SPDX-License-Identifier: MIT

//! Traffic light control from the expression tree
//!
//! As an action the target comes from `Params` and the intersection is
//! switched when evaluated:
//!
//! ```yaml
//! Type: TrafficLightState
//! Params:
//!   TrafficLightId: 34836
//!   StateName: Red
//! ```
//!
//! Without `Params` the same keys sit at the top level and the condition
//! only tests whether the intersection is currently in that state.

use crate::scenario::config::{read_optional, read_required};
use crate::scenario::context::Context;
use crate::scenario::intersection::IntersectionManager;
use crate::sim::condition::Condition;
use crate::sim::error::ConfigurationError;
use serde_yaml::Value;

const TYPE_NAME: &str = "TrafficLightState";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Change,
    Check,
}

pub struct TrafficLightStateCondition {
    name: String,
    mode: Mode,
    traffic_light_id: u64,
    state_name: String,
}

impl TrafficLightStateCondition {
    pub fn new() -> Self {
        Self {
            name: TYPE_NAME.to_string(),
            mode: Mode::Check,
            traffic_light_id: 0,
            state_name: String::new(),
        }
    }

    /// Whether evaluation switches the intersection rather than testing it
    pub fn is_action(&self) -> bool {
        self.mode == Mode::Change
    }
}

impl Default for TrafficLightStateCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition for TrafficLightStateCondition {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, node: &Value, _context: &Context) -> Result<(), ConfigurationError> {
        self.name = read_optional(node, "Name", self.name.clone())?;
        let (mode, target) = match node.get("Params") {
            Some(params) => (Mode::Change, params),
            None => (Mode::Check, node),
        };
        self.mode = mode;
        self.traffic_light_id = read_required(target, "TrafficLightId", TYPE_NAME)?;
        self.state_name = read_required(target, "StateName", TYPE_NAME)?;
        Ok(())
    }

    fn update(&mut self, intersections: &mut IntersectionManager) -> bool {
        match self.mode {
            Mode::Change => intersections.change_to(self.traffic_light_id, &self.state_name),
            Mode::Check => intersections
                .find(self.traffic_light_id)
                .is_some_and(|i| i.current_state() == self.state_name),
        }
    }
}
