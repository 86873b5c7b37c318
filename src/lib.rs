// SPDX-License-Identifier: MIT

//! Scenario scripting and evaluation for autonomous-vehicle simulations.

pub mod scenario;
pub mod sim;
