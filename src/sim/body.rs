//! Body and simulation state types

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A simulated circular body
///
/// Bodies are values: the tick produces new ones instead of mutating the
/// caller's copies. The radius is fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center in arena-local (screen) coordinates
    pub pos: DVec2,
    /// Displacement per tick
    pub vel: DVec2,
    pub radius: f64,
}

impl Body {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self { pos, vel, radius }
    }

    /// Copy of this body advanced by one tick of its velocity
    #[inline]
    pub fn advanced(&self) -> Self {
        Self {
            pos: self.pos + self.vel,
            ..*self
        }
    }

    /// Copy of this body with a different velocity
    #[inline]
    pub fn with_vel(&self, vel: DVec2) -> Self {
        Self { vel, ..*self }
    }

    /// Speed magnitude (per tick)
    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// The live body set between ticks
///
/// Only the driver writes it (through `tick::step`); sinks get a read-only
/// slice. Order carries no physical meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub bodies: Vec<Body>,
}

impl SimulationState {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }
}

impl FromIterator<Body> for SimulationState {
    fn from_iter<I: IntoIterator<Item = Body>>(iter: I) -> Self {
        Self {
            bodies: iter.into_iter().collect(),
        }
    }
}
