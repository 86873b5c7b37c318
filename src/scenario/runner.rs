// SPDX-License-Identifier: MIT

//! Per-tick evaluation of a loaded scenario

use crate::scenario::context::Context;
use crate::scenario::expression::{read, Expression};
use crate::scenario::intersection::IntersectionManager;
use crate::scenario::loader::ScenarioScript;
use crate::sim::error::{ConfigurationError, ScenarioError};
use crate::sim::simulator::SimulationStatus;

/// Owns the end-condition trees and intersections of one scenario run.
///
/// Every call to [`ScenarioRunner::update`] is one tick. The first terminal
/// status is kept for the rest of the run.
pub struct ScenarioRunner {
    context: Context,
    intersections: IntersectionManager,
    success: Expression,
    failure: Expression,
    errors: Vec<ConfigurationError>,
    status: SimulationStatus,
}

impl ScenarioRunner {
    /// Read the intersections and end conditions of `script`.
    ///
    /// Unknown expression shapes fail here. Procedures that could not be
    /// configured do not; they are reported by
    /// [`ScenarioRunner::configuration_errors`] and fail the first tick.
    pub fn new(script: &ScenarioScript, context: Context) -> Result<Self, ScenarioError> {
        log::info!("Intersection:");
        let intersections = IntersectionManager::from_script(&script.intersection, &context);

        let end_condition = &script.story.end_condition;
        let success = read(&end_condition.success, &context)?;
        let failure = match &end_condition.failure {
            Some(node) => read(node, &context)?,
            None => Expression::boolean(false),
        };
        log::info!("Success: {}", success);
        log::info!("Failure: {}", failure);

        let mut errors = success.configuration_errors();
        errors.extend(failure.configuration_errors());

        Ok(Self {
            context,
            intersections,
            success,
            failure,
            errors,
            status: SimulationStatus::Ongoing,
        })
    }

    /// Evaluate one tick
    pub fn update(&mut self) -> SimulationStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.status = self.tick();
        if self.status.is_terminal() {
            log::info!(
                "Scenario {} after {:.2}s, {:.2}m",
                self.status,
                self.context.simulator().current_time().as_secs_f64(),
                self.current_mileage()
            );
        }
        self.status
    }

    fn tick(&mut self) -> SimulationStatus {
        if !self.errors.is_empty() {
            log::error!(
                "Scenario is not configured ({} error(s)), first: {}",
                self.errors.len(),
                self.errors[0]
            );
            return SimulationStatus::Failed;
        }

        let now = self.context.simulator().current_time();
        if self.intersections.update(now) == SimulationStatus::Failed {
            return SimulationStatus::Failed;
        }

        match self.failure.evaluate(&mut self.intersections) {
            Ok(result) if result.is_truthy() => return SimulationStatus::Failed,
            Ok(result) => log::debug!("Failure: {} -> {}", self.failure, result),
            Err(e) => {
                log::error!("Failure condition: {}", e);
                return SimulationStatus::Failed;
            }
        }

        match self.success.evaluate(&mut self.intersections) {
            Ok(result) if result.is_truthy() => SimulationStatus::Succeeded,
            Ok(result) => {
                log::debug!("Success: {} -> {}", self.success, result);
                SimulationStatus::Ongoing
            }
            Err(e) => {
                log::error!("Success condition: {}", e);
                SimulationStatus::Failed
            }
        }
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_configured(&self) -> bool {
        self.errors.is_empty()
    }

    /// Procedure errors from both end conditions
    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        &self.errors
    }

    /// Distance travelled by the ego vehicle so far
    pub fn current_mileage(&self) -> f64 {
        self.context.simulator().move_distance()
    }

    pub fn success(&self) -> &Expression {
        &self.success
    }

    pub fn failure(&self) -> &Expression {
        &self.failure
    }

    pub fn intersections(&self) -> &IntersectionManager {
        &self.intersections
    }

    pub fn intersections_mut(&mut self) -> &mut IntersectionManager {
        &mut self.intersections
    }
}
