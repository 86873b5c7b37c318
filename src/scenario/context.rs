// SPDX-License-Identifier: MIT

//! Evaluation context shared by every procedure and intersection

use crate::scenario::registry::ConditionRegistry;
use crate::sim::simulator::Simulator;
use std::rc::Rc;

/// Read-only handles every node is built against.
///
/// Constructed once per scenario run and passed by reference into the
/// parser and the intersection constructors.
#[derive(Clone)]
pub struct Context {
    simulator: Rc<dyn Simulator>,
    conditions: ConditionRegistry,
}

impl Context {
    pub fn new(simulator: Rc<dyn Simulator>, conditions: ConditionRegistry) -> Self {
        Self {
            simulator,
            conditions,
        }
    }

    /// Context over `simulator` with every built-in condition registered
    pub fn with_builtins(simulator: Rc<dyn Simulator>) -> Self {
        Self::new(simulator, ConditionRegistry::with_builtins())
    }

    pub fn simulator(&self) -> &Rc<dyn Simulator> {
        &self.simulator
    }

    pub fn conditions(&self) -> &ConditionRegistry {
        &self.conditions
    }
}
