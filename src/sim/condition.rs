use crate::scenario::context::Context;
use crate::scenario::intersection::IntersectionManager;
use crate::sim::error::ConfigurationError;
use serde_yaml::Value;

/// Trait for conditions and actions that procedures delegate to.
///
/// Implementations are created through the condition registry and
/// configured exactly once from their script node before any `update`.
pub trait Condition {
    /// Registered type, e.g. `AlwaysTrue` for `AlwaysTrueCondition`
    fn type_name(&self) -> &str;

    /// Name given in the script (`Name` key), defaulting to the type
    fn name(&self) -> &str {
        self.type_name()
    }

    /// Read configuration from the script node
    fn configure(&mut self, node: &Value, context: &Context) -> Result<(), ConfigurationError>;

    /// Evaluate against live state; only called after a successful `configure`
    fn update(&mut self, intersections: &mut IntersectionManager) -> bool;
}
