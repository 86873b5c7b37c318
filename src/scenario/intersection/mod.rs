// SPDX-License-Identifier: MIT

//! Traffic-signal control groups
//!
//! This module provides:
//! - `Intersection` - named-state controller for a group of traffic lights
//! - `IntersectionManager` - lookup of intersections by traffic-light id

mod manager;
mod state_machine;

pub use manager::IntersectionManager;
pub use state_machine::{ControlState, Intersection};
