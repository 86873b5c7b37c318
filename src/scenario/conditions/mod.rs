// SPDX-License-Identifier: MIT

//! Built-in conditions and actions
//!
//! - [always] - `AlwaysTrue` / `AlwaysFalse`
//! - [measurement] - `ElapsedTime`, `TravelDistance`, `Speed` thresholds
//! - [traffic_light] - `TrafficLightState` action and predicate

pub mod always;
pub mod measurement;
pub mod traffic_light;

use crate::scenario::registry::{ConditionRegistry, CONDITION_SUFFIX};
use serde::Deserialize;

/// Tolerance used by [`Rule::EqualTo`]
pub const EQUAL_TOLERANCE: f64 = 1e-6;

/// Comparison applied between a measured quantity and a script threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    #[default]
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Rule {
    pub fn compare(self, measured: f64, threshold: f64) -> bool {
        match self {
            Rule::GreaterThan => measured > threshold,
            Rule::LessThan => measured < threshold,
            Rule::EqualTo => (measured - threshold).abs() < EQUAL_TOLERANCE,
        }
    }
}

/// Register every built-in condition under `<Type>Condition`
pub fn register_builtins(registry: &ConditionRegistry) {
    let key = |type_name: &str| format!("{}{}", type_name, CONDITION_SUFFIX);

    registry.register(key("AlwaysTrue"), || Box::new(always::AlwaysCondition::always_true()));
    registry.register(key("AlwaysFalse"), || Box::new(always::AlwaysCondition::always_false()));
    registry.register(key("ElapsedTime"), || {
        Box::new(measurement::MeasurementCondition::elapsed_time())
    });
    registry.register(key("TravelDistance"), || {
        Box::new(measurement::MeasurementCondition::travel_distance())
    });
    registry.register(key("Speed"), || Box::new(measurement::MeasurementCondition::speed()));
    registry.register(key("TrafficLightState"), || {
        Box::new(traffic_light::TrafficLightStateCondition::new())
    });
}
