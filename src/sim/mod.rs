//! Deterministic simulation module
//!
//! All physics and escape logic lives here. This module must be pure and deterministic:
//! - One tick per call, paced by the caller
//! - Seeded RNG only, passed in explicitly
//! - No rendering, file or platform dependencies

pub mod arena;
pub mod body;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod policy;
pub mod spawn;
pub mod tick;

pub use arena::{Arena, Gap, GapSide, Viewport};
pub use body::{Body, SimulationState};
pub use collision::{WallContact, bounce_off_wall, reflect_in_place, reflect_velocity};
pub use error::{ConfigError, InvariantViolation};
pub use geometry::{
    distance_from_center, is_beyond_wall, is_in_gap, is_past_boundary, is_safely_inside,
    outward_normal,
};
pub use policy::{Absorb, BounceAndDuplicate, EscapePolicy, PassThrough, PolicyKind, Resolution};
pub use spawn::Spawner;
pub use tick::{EventCounts, RemovalReason, SimEvent, StepOutput, StepRules, step};
