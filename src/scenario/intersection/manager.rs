// SPDX-License-Identifier: MIT

use super::state_machine::Intersection;
use crate::scenario::context::Context;
use crate::sim::error::ConfigurationError;
use crate::sim::simulator::SimulationStatus;
use serde_yaml::Value;
use std::time::Duration;

/// Lookup service over every intersection of a scenario, keyed by the
/// traffic-light ids each one controls.
#[derive(Default)]
pub struct IntersectionManager {
    intersections: Vec<Intersection>,
}

impl IntersectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one intersection per `Intersection` block of the script
    pub fn from_script(blocks: &[Value], context: &Context) -> Self {
        let mut manager = Self::new();
        for (index, block) in blocks.iter().enumerate() {
            log::info!("  Intersection[{}]:", index);
            manager.add(Intersection::new(block, context));
        }
        manager
    }

    pub fn add(&mut self, intersection: Intersection) {
        for &id in intersection.ids() {
            if self.find(id).is_some() {
                log::warn!(
                    "Traffic light {} is already controlled by another intersection; lookups resolve to the first",
                    id
                );
            }
        }
        self.intersections.push(intersection);
    }

    /// Intersection controlling traffic light `id`
    pub fn find(&self, id: u64) -> Option<&Intersection> {
        self.intersections.iter().find(|i| i.controls(id))
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Intersection> {
        self.intersections.iter_mut().find(|i| i.controls(id))
    }

    /// Switch the intersection controlling `id` to `state_name`
    pub fn change_to(&mut self, id: u64, state_name: &str) -> bool {
        match self.find_mut(id) {
            Some(intersection) => intersection.change_to(state_name),
            None => {
                log::warn!("No intersection controls traffic light {}", id);
                false
            }
        }
    }

    /// Tick every intersection; the first non-ongoing status wins
    pub fn update(&mut self, now: Duration) -> SimulationStatus {
        let mut status = SimulationStatus::Ongoing;
        for intersection in &mut self.intersections {
            let current = intersection.update(now);
            if !status.is_terminal() {
                status = current;
            }
        }
        status
    }

    /// Configuration errors recorded by every intersection
    pub fn errors(&self) -> Vec<ConfigurationError> {
        self.intersections
            .iter()
            .flat_map(|i| i.errors().iter().cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.iter()
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::simulator::OfflineSimulator;
    use std::rc::Rc;

    fn manager_from(yaml: &str) -> (Rc<OfflineSimulator>, IntersectionManager) {
        let sim = Rc::new(OfflineSimulator::new(0.0));
        let context = Context::with_builtins(sim.clone());
        let blocks: Vec<Value> = serde_yaml::from_str(yaml).unwrap();
        (sim, IntersectionManager::from_script(&blocks, &context))
    }

    const TWO_GROUPS: &str = r#"
- TrafficLightId: [1, 2]
  Control:
    - StateName: Red
      Color: Red
- TrafficLightId: [3]
  Control:
    - StateName: Green
      Color: Green
"#;

    #[test]
    fn test_find_by_any_controlled_id() {
        let (_, manager) = manager_from(TWO_GROUPS);
        assert_eq!(manager.len(), 2);

        assert_eq!(manager.find(1).unwrap().ids(), &[1, 2]);
        assert_eq!(manager.find(2).unwrap().ids(), &[1, 2]);
        assert_eq!(manager.find(3).unwrap().ids(), &[3]);
        assert!(manager.find(4).is_none());
    }

    #[test]
    fn test_change_to_routes_to_owning_intersection() {
        let (sim, mut manager) = manager_from(TWO_GROUPS);

        assert!(manager.change_to(2, "Red"));
        assert_eq!(manager.find(1).unwrap().current_state(), "Red");
        assert_eq!(manager.find(3).unwrap().current_state(), "Blank");
        assert_eq!(sim.traffic_light(1).unwrap().color, "Red");
        assert!(sim.traffic_light(3).is_none());
    }

    #[test]
    fn test_change_to_unknown_id_fails() {
        let (_, mut manager) = manager_from(TWO_GROUPS);
        assert!(!manager.change_to(99, "Red"));
    }

    #[test]
    fn test_overlapping_ids_resolve_to_first() {
        let (_, manager) = manager_from(
            r#"
- TrafficLightId: [1]
  Control:
    - StateName: A
- TrafficLightId: [1, 5]
  Control:
    - StateName: B
"#,
        );
        assert!(manager.find(1).unwrap().has_state("A"));
        assert!(manager.find(5).unwrap().has_state("B"));
    }

    #[test]
    fn test_errors_are_collected_from_every_intersection() {
        let (_, manager) = manager_from(
            r#"
- Control:
    - StateName: A
- TrafficLightId: [2]
"#,
        );
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.errors().len(), 2);
    }

    #[test]
    fn test_update_reports_ongoing() {
        let (_, mut manager) = manager_from(TWO_GROUPS);
        assert_eq!(manager.update(Duration::from_secs(1)), SimulationStatus::Ongoing);
        assert!(IntersectionManager::new().is_empty());
    }
}
