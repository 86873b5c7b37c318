// SPDX-License-Identifier: MIT

//! Scenario scripts: expressions, intersections and the per-tick runner

pub mod conditions;
pub mod config;
pub mod context;
pub mod expression;
pub mod intersection;
pub mod loader;
pub mod registry;
pub mod runner;

pub use context::Context;
pub use loader::{ScenarioLoader, ScenarioScript};
pub use runner::ScenarioRunner;
