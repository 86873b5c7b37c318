// SPDX-License-Identifier: MIT

use crate::sim::condition::Condition;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Creates a fresh, unconfigured condition instance
pub type ConditionFactory = Arc<dyn Fn() -> Box<dyn Condition> + Send + Sync>;

/// Suffix appended to a script `Type` to form the registry key
pub const CONDITION_SUFFIX: &str = "Condition";

/// Name → factory table for condition/action plugins, populated at start-up.
#[derive(Clone)]
pub struct ConditionRegistry {
    factories: Arc<RwLock<HashMap<String, ConditionFactory>>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry pre-populated with every built-in condition
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::scenario::conditions::register_builtins(&registry);
        registry
    }

    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Condition> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registered condition: {}", name);
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        factories.insert(name, Arc::new(factory));
    }

    /// Instantiate the condition registered under exactly `name`
    pub fn create(&self, name: &str) -> Option<Box<dyn Condition>> {
        let factory = {
            let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
            factories.get(name).cloned()
        }?;
        Some(factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::context::Context;
    use crate::scenario::intersection::IntersectionManager;
    use crate::sim::error::ConfigurationError;
    use serde_yaml::Value;

    /// A mock condition for testing
    struct MockCondition {
        type_name: String,
    }

    impl MockCondition {
        fn boxed(type_name: &str) -> Box<dyn Condition> {
            Box::new(Self {
                type_name: type_name.to_string(),
            })
        }
    }

    impl Condition for MockCondition {
        fn type_name(&self) -> &str {
            &self.type_name
        }

        fn configure(&mut self, _node: &Value, _context: &Context) -> Result<(), ConfigurationError> {
            Ok(())
        }

        fn update(&mut self, _intersections: &mut IntersectionManager) -> bool {
            true
        }
    }

    #[test]
    fn test_register_and_create_condition() {
        let registry = ConditionRegistry::new();
        registry.register("MockCondition", || MockCondition::boxed("Mock"));

        let created = registry.create("MockCondition");
        assert!(created.is_some());
        assert_eq!(created.unwrap().type_name(), "Mock");
    }

    #[test]
    fn test_create_nonexistent_condition() {
        let registry = ConditionRegistry::new();
        assert!(registry.create("nonexistent").is_none());
        assert!(!registry.contains("nonexistent"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ConditionRegistry::new();
        registry.register("MockCondition", || MockCondition::boxed("Mock"));

        assert!(registry.create("Mock").is_none());
        assert!(registry.create("mockcondition").is_none());
        assert!(registry.create("MockConditionX").is_none());
    }

    #[test]
    fn test_register_overwrites_existing() {
        let registry = ConditionRegistry::new();
        registry.register("SameCondition", || MockCondition::boxed("First"));
        registry.register("SameCondition", || MockCondition::boxed("Second"));

        assert_eq!(registry.names(), vec!["SameCondition".to_string()]);
        assert_eq!(registry.create("SameCondition").unwrap().type_name(), "Second");
    }

    #[test]
    fn test_each_create_is_a_new_instance() {
        let registry = ConditionRegistry::new();
        registry.register("MockCondition", || MockCondition::boxed("Mock"));

        let a = registry.create("MockCondition").unwrap();
        let b = registry.create("MockCondition").unwrap();
        let a_ptr = &*a as *const dyn Condition as *const u8;
        let b_ptr = &*b as *const dyn Condition as *const u8;
        assert_ne!(a_ptr, b_ptr);
    }

    #[test]
    fn test_registry_is_clone() {
        let registry = ConditionRegistry::new();
        registry.register("OneCondition", || MockCondition::boxed("One"));

        let cloned = registry.clone();
        assert!(cloned.contains("OneCondition"));

        // Registering on clone should be visible to original
        cloned.register("TwoCondition", || MockCondition::boxed("Two"));
        assert!(registry.contains("TwoCondition"));
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ConditionRegistry::with_builtins();
        for name in [
            "AlwaysTrueCondition",
            "AlwaysFalseCondition",
            "ElapsedTimeCondition",
            "TravelDistanceCondition",
            "SpeedCondition",
            "TrafficLightStateCondition",
        ] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
    }
}
