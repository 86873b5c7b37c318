// SPDX-License-Identifier: MIT

//! Simulator capability consumed by the scenario engine
//!
//! The engine never owns the simulator. It talks to it through the
//! [`Simulator`] trait, which implementations satisfy with interior
//! mutability so a single `Rc<dyn Simulator>` can be shared by every
//! procedure and intersection.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Colour/arrow value meaning "light off"
pub const BLANK: &str = "Blank";

/// Trait for the simulator the scenario runs against.
pub trait Simulator {
    /// Set the colour shown by a traffic light
    fn set_traffic_light_color(&self, id: u64, color: &str) -> bool;

    /// Set the arrow shown by a traffic light
    fn set_traffic_light_arrow(&self, id: u64, arrow: &str) -> bool;

    /// Simulation time elapsed since the scenario started
    fn current_time(&self) -> Duration;

    /// Distance travelled by the ego vehicle, in metres
    fn move_distance(&self) -> f64;

    /// Current speed of the ego vehicle, in metres per second
    fn current_speed(&self) -> f64;
}

/// Outcome of one scenario tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationStatus {
    #[default]
    Ongoing,
    Succeeded,
    Failed,
}

impl SimulationStatus {
    /// Whether the scenario has reached a final verdict
    pub fn is_terminal(self) -> bool {
        !matches!(self, SimulationStatus::Ongoing)
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationStatus::Ongoing => write!(f, "ongoing"),
            SimulationStatus::Succeeded => write!(f, "succeeded"),
            SimulationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Last colour and arrow applied to a traffic light
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficLight {
    pub color: String,
    pub arrow: String,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self {
            color: BLANK.to_string(),
            arrow: BLANK.to_string(),
        }
    }
}

/// Deterministic stand-in simulator for dry runs and tests.
///
/// The ego vehicle moves at a constant speed; time only moves when
/// [`OfflineSimulator::advance`] is called.
#[derive(Debug, Default)]
pub struct OfflineSimulator {
    clock: Cell<Duration>,
    distance: Cell<f64>,
    speed: Cell<f64>,
    lights: RefCell<BTreeMap<u64, TrafficLight>>,
}

impl OfflineSimulator {
    pub fn new(speed: f64) -> Self {
        Self {
            speed: Cell::new(speed),
            ..Self::default()
        }
    }

    /// Move simulation time forward and integrate travelled distance
    pub fn advance(&self, dt: Duration) {
        self.clock.set(self.clock.get() + dt);
        self.distance
            .set(self.distance.get() + self.speed.get() * dt.as_secs_f64());
    }

    pub fn set_speed(&self, speed: f64) {
        self.speed.set(speed);
    }

    /// Current state of one traffic light, if anything was ever applied to it
    pub fn traffic_light(&self, id: u64) -> Option<TrafficLight> {
        self.lights.borrow().get(&id).cloned()
    }

    fn with_light(&self, id: u64, apply: impl FnOnce(&mut TrafficLight)) {
        let mut lights = self.lights.borrow_mut();
        apply(lights.entry(id).or_default());
    }
}

impl Simulator for OfflineSimulator {
    fn set_traffic_light_color(&self, id: u64, color: &str) -> bool {
        log::info!("Traffic light {} color -> {}", id, color);
        self.with_light(id, |light| light.color = color.to_string());
        true
    }

    fn set_traffic_light_arrow(&self, id: u64, arrow: &str) -> bool {
        log::info!("Traffic light {} arrow -> {}", id, arrow);
        self.with_light(id, |light| light.arrow = arrow.to_string());
        true
    }

    fn current_time(&self) -> Duration {
        self.clock.get()
    }

    fn move_distance(&self) -> f64 {
        self.distance.get()
    }

    fn current_speed(&self) -> f64 {
        self.speed.get()
    }
}
