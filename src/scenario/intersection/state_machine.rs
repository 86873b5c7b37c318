// SPDX-License-Identifier: MIT

//! Named-state controller for one group of traffic lights

use crate::scenario::config::read_required;
use crate::scenario::context::Context;
use crate::sim::error::ConfigurationError;
use crate::sim::simulator::{SimulationStatus, Simulator, BLANK};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Payload applied to every light of the group when a state is entered
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlState {
    #[serde(rename = "StateName")]
    pub name: String,
    #[serde(rename = "Color", default = "blank")]
    pub color: String,
    #[serde(rename = "Arrow", default = "blank")]
    pub arrow: String,
    /// The whole `Control` entry as written, including keys not modelled above
    #[serde(skip)]
    pub raw: Value,
}

fn blank() -> String {
    BLANK.to_string()
}

/// Payload for any state name the script does not define
static BLANK_STATE: Lazy<ControlState> = Lazy::new(|| ControlState {
    name: blank(),
    color: blank(),
    arrow: blank(),
    raw: Value::Null,
});

/// One traffic-signal control group.
///
/// States come from the `Control` list of the script block. Any other name
/// is the implicit Blank state, so every transition target is valid.
pub struct Intersection {
    ids: Vec<u64>,
    states: HashMap<String, ControlState>,
    current_state: String,
    simulator: Rc<dyn Simulator>,
    errors: Vec<ConfigurationError>,
}

impl Intersection {
    /// Build from an `Intersection` script block.
    ///
    /// Missing `TrafficLightId` or `Control` keys are logged and recorded in
    /// [`Intersection::errors`]; construction still completes.
    pub fn new(script: &Value, context: &Context) -> Self {
        let mut errors = Vec::new();

        let ids = match read_required::<Vec<u64>>(script, "TrafficLightId", "Intersection") {
            Ok(ids) if ids.is_empty() => {
                errors.push(ConfigurationError::invalid_value(
                    "TrafficLightId",
                    "must list at least one traffic light id",
                ));
                ids
            }
            Ok(ids) => {
                log::info!("    TrafficLightId: {:?}", ids);
                ids
            }
            Err(e) => {
                errors.push(e);
                Vec::new()
            }
        };

        let mut states = HashMap::new();
        match script.get("Control") {
            Some(Value::Sequence(controls)) => {
                log::info!("    Control:");
                for each in controls {
                    match read_control(each) {
                        Ok(state) => {
                            log::info!("      - StateName: {}", state.name);
                            if states.contains_key(&state.name) {
                                log::warn!(
                                    "Duplicate StateName '{}' ignored, keeping the first",
                                    state.name
                                );
                            } else {
                                states.insert(state.name.clone(), state);
                            }
                        }
                        Err(e) => errors.push(e),
                    }
                }
            }
            Some(_) => errors.push(ConfigurationError::invalid_value(
                "Control",
                "expected a list of control states",
            )),
            None => errors.push(ConfigurationError::missing_key(
                "Control",
                "Intersection",
                script,
            )),
        }

        for e in &errors {
            log::error!("{}", e);
        }

        Self {
            ids,
            states,
            current_state: blank(),
            simulator: context.simulator().clone(),
            errors,
        }
    }

    /// Enter `state_name` and apply its payload to every light of the group.
    ///
    /// Unknown names apply the Blank payload; the requested name is still
    /// recorded as the current state.
    pub fn change_to(&mut self, state_name: &str) -> bool {
        self.current_state = state_name.to_string();
        let state = self.states.get(state_name).unwrap_or(&*BLANK_STATE);
        log::info!(
            "Intersection {:?} -> {} (Color: {}, Arrow: {})",
            self.ids,
            state_name,
            state.color,
            state.arrow
        );

        let mut applied = true;
        for &id in &self.ids {
            applied &= self.simulator.set_traffic_light_color(id, &state.color);
            applied &= self.simulator.set_traffic_light_arrow(id, &state.arrow);
        }
        if !applied {
            log::warn!("Simulator rejected state '{}' for {:?}", state_name, self.ids);
        }
        applied
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn controls(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn has_state(&self, state_name: &str) -> bool {
        self.states.contains_key(state_name)
    }

    /// Payload applied for `state_name`, Blank when undefined
    pub fn state(&self, state_name: &str) -> &ControlState {
        self.states.get(state_name).unwrap_or(&*BLANK_STATE)
    }

    pub fn errors(&self) -> &[ConfigurationError] {
        &self.errors
    }

    /// Transitions are driven externally, so the group never finishes on its own
    pub fn update(&mut self, _now: Duration) -> SimulationStatus {
        SimulationStatus::Ongoing
    }
}

fn read_control(node: &Value) -> Result<ControlState, ConfigurationError> {
    if node.get("StateName").is_none() {
        return Err(ConfigurationError::missing_key("StateName", "Control", node));
    }
    let mut state: ControlState = serde_yaml::from_value(node.clone())
        .map_err(|e| ConfigurationError::invalid_value("Control", e))?;
    state.raw = node.clone();
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::simulator::{OfflineSimulator, TrafficLight};

    fn setup(yaml: &str) -> (Rc<OfflineSimulator>, Intersection) {
        let sim = Rc::new(OfflineSimulator::new(0.0));
        let context = Context::with_builtins(sim.clone());
        let script: Value = serde_yaml::from_str(yaml).unwrap();
        (sim, Intersection::new(&script, &context))
    }

    const TWO_STATES: &str = r#"
TrafficLightId: [34836, 34834]
Control:
  - StateName: Stop
    Color: Red
  - StateName: Go
    Color: Green
    Arrow: Right
"#;

    /// Simulator that refuses every arrow change
    struct StubbornSimulator;

    impl Simulator for StubbornSimulator {
        fn set_traffic_light_color(&self, _id: u64, _color: &str) -> bool {
            true
        }

        fn set_traffic_light_arrow(&self, _id: u64, _arrow: &str) -> bool {
            false
        }

        fn current_time(&self) -> Duration {
            Duration::ZERO
        }

        fn move_distance(&self) -> f64 {
            0.0
        }

        fn current_speed(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_parse_ids_and_states() {
        let (_, intersection) = setup(TWO_STATES);
        assert_eq!(intersection.ids(), &[34836, 34834]);
        assert!(intersection.has_state("Stop"));
        assert!(intersection.has_state("Go"));
        assert!(!intersection.has_state("Blank"));
        assert!(intersection.errors().is_empty());
        assert_eq!(intersection.current_state(), "Blank");
    }

    #[test]
    fn test_change_to_applies_payload_to_every_id() {
        let (sim, mut intersection) = setup(TWO_STATES);

        assert!(intersection.change_to("Go"));
        assert_eq!(intersection.current_state(), "Go");
        for id in [34836, 34834] {
            assert_eq!(
                sim.traffic_light(id),
                Some(TrafficLight {
                    color: "Green".to_string(),
                    arrow: "Right".to_string(),
                })
            );
        }
    }

    #[test]
    fn test_missing_arrow_defaults_to_blank() {
        let (sim, mut intersection) = setup(TWO_STATES);
        assert!(intersection.change_to("Stop"));
        assert_eq!(sim.traffic_light(34836).unwrap().arrow, "Blank");
        assert_eq!(intersection.state("Stop").color, "Red");
    }

    #[test]
    fn test_unknown_state_falls_back_to_blank_and_keeps_requested_name() {
        let (sim, mut intersection) = setup(TWO_STATES);
        assert!(intersection.change_to("Go"));

        assert!(intersection.change_to("NameNotInControl"));
        assert_eq!(intersection.current_state(), "NameNotInControl");
        assert_eq!(
            sim.traffic_light(34834),
            Some(TrafficLight {
                color: "Blank".to_string(),
                arrow: "Blank".to_string(),
            })
        );
    }

    #[test]
    fn test_change_to_reports_simulator_failure() {
        let context = Context::with_builtins(Rc::new(StubbornSimulator));
        let script: Value = serde_yaml::from_str(TWO_STATES).unwrap();
        let mut intersection = Intersection::new(&script, &context);

        assert!(!intersection.change_to("Go"));
        // The state is entered even though the simulator refused it
        assert_eq!(intersection.current_state(), "Go");
    }

    #[test]
    fn test_missing_traffic_light_id_is_tolerated() {
        let (_, mut intersection) = setup("Control:\n  - StateName: Stop\n    Color: Red\n");
        assert!(intersection.ids().is_empty());
        assert!(intersection.has_state("Stop"));
        assert_eq!(intersection.errors().len(), 1);
        assert!(matches!(
            &intersection.errors()[0],
            ConfigurationError::MissingKey { key, .. } if key == "TrafficLightId"
        ));
        // No lights to drive, so the change trivially succeeds
        assert!(intersection.change_to("Stop"));
    }

    #[test]
    fn test_empty_traffic_light_id_is_reported() {
        let (_, intersection) = setup("TrafficLightId: []\nControl: []\n");
        assert_eq!(intersection.errors().len(), 1);
        assert!(matches!(
            &intersection.errors()[0],
            ConfigurationError::InvalidValue { key, .. } if key == "TrafficLightId"
        ));
    }

    #[test]
    fn test_missing_control_is_tolerated() {
        let (_, intersection) = setup("TrafficLightId: [1]\n");
        assert_eq!(intersection.ids(), &[1]);
        assert!(matches!(
            &intersection.errors()[0],
            ConfigurationError::MissingKey { key, .. } if key == "Control"
        ));
    }

    #[test]
    fn test_control_entry_without_state_name_is_skipped() {
        let (_, intersection) = setup(
            r#"
TrafficLightId: [1]
Control:
  - Color: Red
  - StateName: Go
    Color: Green
"#,
        );
        assert!(intersection.has_state("Go"));
        assert_eq!(intersection.errors().len(), 1);
        assert!(matches!(
            &intersection.errors()[0],
            ConfigurationError::MissingKey { key, .. } if key == "StateName"
        ));
    }

    #[test]
    fn test_duplicate_state_keeps_first() {
        let (_, intersection) = setup(
            r#"
TrafficLightId: [1]
Control:
  - StateName: Go
    Color: Green
  - StateName: Go
    Color: Yellow
"#,
        );
        assert_eq!(intersection.state("Go").color, "Green");
    }

    #[test]
    fn test_extra_control_keys_are_kept() {
        let (_, intersection) = setup(
            r#"
TrafficLightId: [1]
Control:
  - StateName: Go
    Color: Green
    Blink: 0.5
"#,
        );
        let go = intersection.state("Go");
        assert_eq!(go.color, "Green");
        assert_eq!(go.arrow, "Blank");
        assert_eq!(go.raw.get("Blink").and_then(Value::as_f64), Some(0.5));
        assert_eq!(go.raw.get("StateName").and_then(Value::as_str), Some("Go"));

        assert!(intersection.state("Undefined").raw.is_null());
    }

    #[test]
    fn test_update_is_always_ongoing() {
        let (_, mut intersection) = setup(TWO_STATES);
        assert_eq!(intersection.update(Duration::ZERO), SimulationStatus::Ongoing);
        intersection.change_to("Stop");
        assert_eq!(
            intersection.update(Duration::from_secs(60)),
            SimulationStatus::Ongoing
        );
    }
}
