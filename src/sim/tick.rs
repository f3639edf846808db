//! Fixed-rate simulation step
//!
//! Advances every body by one tick and produces a fresh body set. There is no
//! body-body interaction, so each body is resolved on its own; the result is
//! the same multiset whatever order the input is in.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::{Arena, Viewport};
use super::body::{Body, SimulationState};
use super::error::InvariantViolation;
use super::geometry::{is_past_boundary, is_safely_inside};
use super::policy::{EscapePolicy, Resolution};
use super::spawn::Spawner;

/// Per-run rules the step needs besides the policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRules {
    pub spawner: Spawner,
    /// Bodies whose center leaves this rectangle are culled
    pub viewport: Option<Viewport>,
}

impl StepRules {
    pub fn new(spawner: Spawner, viewport: Option<Viewport>) -> Self {
        Self { spawner, viewport }
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        self.spawner.arena()
    }
}

/// Why a body left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Removed at the wall by the escape policy
    Escaped,
    /// Culled after its center left the viewport
    LeftViewport,
}

/// Something observable that happened during a tick
///
/// Events are for logging and metrics only; they never feed back into the
/// next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Spawned { body: Body },
    Removed { body: Body, reason: RemovalReason },
    Reflected { body: Body },
    PassedThrough { body: Body },
}

/// Tally of a tick's (or a run's) events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub spawned: u64,
    pub escaped: u64,
    pub left_viewport: u64,
    pub reflected: u64,
    pub passed_through: u64,
}

impl EventCounts {
    pub fn from_events(events: &[SimEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.record(event);
        }
        counts
    }

    pub fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Spawned { .. } => self.spawned += 1,
            SimEvent::Removed {
                reason: RemovalReason::Escaped,
                ..
            } => self.escaped += 1,
            SimEvent::Removed {
                reason: RemovalReason::LeftViewport,
                ..
            } => self.left_viewport += 1,
            SimEvent::Reflected { .. } => self.reflected += 1,
            SimEvent::PassedThrough { .. } => self.passed_through += 1,
        }
    }

    pub fn merge(&mut self, other: &EventCounts) {
        self.spawned += other.spawned;
        self.escaped += other.escaped;
        self.left_viewport += other.left_viewport;
        self.reflected += other.reflected;
        self.passed_through += other.passed_through;
    }
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub state: SimulationState,
    pub events: Vec<SimEvent>,
}

impl StepOutput {
    pub fn counts(&self) -> EventCounts {
        EventCounts::from_events(&self.events)
    }
}

/// Seed for one body's private spawn stream
///
/// Mixes the tick salt with the body's bit pattern so replacements depend on
/// the body itself rather than on where it sits in the input.
fn body_seed(salt: u64, body: &Body) -> u64 {
    let words = [
        body.pos.x.to_bits(),
        body.pos.y.to_bits(),
        body.vel.x.to_bits(),
        body.vel.y.to_bits(),
        body.radius.to_bits(),
    ];
    words.iter().fold(salt, |acc, &w| {
        let mut h = (acc ^ w).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 32;
        h.wrapping_mul(0xBF58_476D_1CE4_E5B9) ^ (h >> 29)
    })
}

/// Advance the body set by one tick
///
/// Draws exactly one `u64` from `rng` per call, whatever happens during the
/// tick. Each body is integrated, then resolved by `policy` if its rim has
/// reached the wall; finally bodies outside the viewport are culled.
pub fn step<P, R>(
    state: &SimulationState,
    rules: &StepRules,
    policy: &P,
    rng: &mut R,
) -> Result<StepOutput, InvariantViolation>
where
    P: EscapePolicy,
    R: Rng + ?Sized,
{
    let arena = rules.arena();
    let salt: u64 = rng.random();

    let mut bodies = Vec::with_capacity(state.len() + 2);
    let mut events = Vec::new();

    for body in state.bodies() {
        let moved = body.advanced();

        if is_safely_inside(&moved, arena) {
            bodies.push(moved);
            continue;
        }
        // Neither inside nor past: the position is not a number
        if !is_past_boundary(&moved, arena) {
            return Err(InvariantViolation::UnresolvedBoundary { position: moved.pos });
        }

        let mut body_rng = Pcg32::seed_from_u64(body_seed(salt, &moved));
        match policy.resolve(&moved, &rules.spawner, &mut body_rng)? {
            Resolution::Bounced { body, reflected } => {
                if reflected {
                    log::trace!("Reflected at ({:.1}, {:.1})", body.pos.x, body.pos.y);
                    events.push(SimEvent::Reflected { body });
                }
                bodies.push(body);
            }
            Resolution::PassedThrough(body) => {
                events.push(SimEvent::PassedThrough { body });
                bodies.push(body);
            }
            Resolution::Removed => {
                log::debug!("Escaped at ({:.1}, {:.1})", moved.pos.x, moved.pos.y);
                events.push(SimEvent::Removed {
                    body: moved,
                    reason: RemovalReason::Escaped,
                });
            }
            Resolution::Split(pair) => {
                log::debug!(
                    "Escaped at ({:.1}, {:.1}), splitting in two",
                    moved.pos.x,
                    moved.pos.y
                );
                events.push(SimEvent::Removed {
                    body: moved,
                    reason: RemovalReason::Escaped,
                });
                for spawned in pair {
                    events.push(SimEvent::Spawned { body: spawned });
                    bodies.push(spawned);
                }
            }
        }
    }

    if let Some(viewport) = rules.viewport {
        bodies.retain(|body| {
            if viewport.contains(body.pos) {
                return true;
            }
            log::debug!("Culled off-screen at ({:.1}, {:.1})", body.pos.x, body.pos.y);
            events.push(SimEvent::Removed {
                body: *body,
                reason: RemovalReason::LeftViewport,
            });
            false
        });
    }

    Ok(StepOutput {
        state: SimulationState::new(bodies),
        events,
    })
}
