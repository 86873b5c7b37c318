// SPDX-License-Identifier: MIT

//! Threshold tests on quantities reported by the simulator
//!
//! ```yaml
//! Type: TravelDistance
//! Value: 120.0
//! Rule: greaterThan
//! ```

use super::Rule;
use crate::scenario::config::{read_optional, read_required};
use crate::scenario::context::Context;
use crate::scenario::intersection::IntersectionManager;
use crate::sim::condition::Condition;
use crate::sim::error::ConfigurationError;
use crate::sim::simulator::Simulator;
use serde_yaml::Value;
use std::rc::Rc;

/// Reads one quantity from the simulator
type Measure = fn(&dyn Simulator) -> f64;

/// Compares a simulator quantity against the script `Value` using `Rule`
pub struct MeasurementCondition {
    type_name: &'static str,
    measure: Measure,
    name: String,
    threshold: f64,
    rule: Rule,
    simulator: Option<Rc<dyn Simulator>>,
}

impl MeasurementCondition {
    fn new(type_name: &'static str, measure: Measure) -> Self {
        Self {
            type_name,
            measure,
            name: type_name.to_string(),
            threshold: 0.0,
            rule: Rule::default(),
            simulator: None,
        }
    }

    /// Seconds of simulation time since the scenario started
    pub fn elapsed_time() -> Self {
        Self::new("ElapsedTime", |sim| sim.current_time().as_secs_f64())
    }

    /// Metres travelled by the ego vehicle
    pub fn travel_distance() -> Self {
        Self::new("TravelDistance", |sim| sim.move_distance())
    }

    /// Current ego speed in metres per second
    pub fn speed() -> Self {
        Self::new("Speed", |sim| sim.current_speed())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }
}

impl Condition for MeasurementCondition {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, node: &Value, context: &Context) -> Result<(), ConfigurationError> {
        self.name = read_optional(node, "Name", self.name.clone())?;
        self.threshold = read_required(node, "Value", self.type_name)?;
        self.rule = read_optional(node, "Rule", Rule::default())?;
        self.simulator = Some(context.simulator().clone());
        Ok(())
    }

    fn update(&mut self, _intersections: &mut IntersectionManager) -> bool {
        match &self.simulator {
            Some(simulator) => {
                let measured = (self.measure)(&**simulator);
                let result = self.rule.compare(measured, self.threshold);
                log::debug!(
                    "{}: {} {:?} {} -> {}",
                    self.name,
                    measured,
                    self.rule,
                    self.threshold,
                    result
                );
                result
            }
            None => false,
        }
    }
}
