//! Boundary geometry
//!
//! Pure predicates relating a body to the arena wall and the gap. The
//! crossing test compares the body's far edge against the wall, so a body is
//! "past" the boundary as soon as its rim touches it.

use glam::DVec2;

use super::arena::{Arena, GapSide};
use super::body::Body;
use super::error::InvariantViolation;

/// Distance from the arena center to the body center
#[inline]
pub fn distance_from_center(body: &Body, arena: &Arena) -> f64 {
    body.pos.distance(arena.center)
}

/// Far edge of the body touches or crosses the wall
#[inline]
pub fn is_past_boundary(body: &Body, arena: &Arena) -> bool {
    distance_from_center(body, arena) + body.radius >= arena.radius
}

/// Exact complement of `is_past_boundary`
#[inline]
pub fn is_safely_inside(body: &Body, arena: &Arena) -> bool {
    distance_from_center(body, arena) + body.radius < arena.radius
}

/// The body center itself has reached the wall (only pass-through bodies get here)
#[inline]
pub fn is_beyond_wall(body: &Body, arena: &Arena) -> bool {
    distance_from_center(body, arena) >= arena.radius
}

/// Unit vector from the arena center toward the body center
///
/// A body on the exact center has no outward direction; that is a logic
/// defect upstream, reported rather than papered over with a zero vector.
pub fn outward_normal(body: &Body, arena: &Arena) -> Result<DVec2, InvariantViolation> {
    let offset = body.pos - arena.center;
    let dist = offset.length();
    if dist == 0.0 || !dist.is_finite() {
        return Err(InvariantViolation::DegenerateNormal { position: body.pos });
    }
    Ok(offset / dist)
}

/// Body center is within the gap's horizontal extent on the gap's side
///
/// Linear approximation of the aperture (x offset against half-width), not an
/// arc-length test. The edge `|dx| == half_width` counts as inside.
pub fn is_in_gap(body: &Body, arena: &Arena) -> bool {
    let dx = (body.pos.x - arena.gap_mid_x()).abs();
    if dx > arena.gap.half_width {
        return false;
    }
    match arena.gap.side {
        GapSide::Top => body.pos.y < arena.center.y,
        GapSide::Bottom => body.pos.y > arena.center.y,
    }
}
