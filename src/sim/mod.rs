// SPDX-License-Identifier: MIT

//! Simulation-facing abstractions
//!
//! - [simulator] - the simulator capability and the offline stand-in
//! - [condition] - the contract every condition/action plugin implements
//! - [error] - typed errors shared by the whole crate

pub mod condition;
pub mod error;
pub mod simulator;
