//! Collision response against the arena wall
//!
//! The only physics rule is specular reflection: no restitution loss, no
//! friction, speed preserved up to rounding.

use glam::DVec2;

use super::arena::Arena;
use super::body::Body;
use super::error::InvariantViolation;
use super::geometry::outward_normal;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `n` a unit normal
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Result of resolving a body against the wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Body after response (velocity reflected, rim back on the wall)
    pub body: Body,
    /// Whether the velocity was actually reflected
    pub reflected: bool,
    /// How far the rim was past the wall before correction
    pub penetration: f64,
}

/// Bounce a body that has reached the wall
///
/// Only an outward-moving body is reflected, so a body already heading back
/// inside is never flipped outward again. The position is then projected so
/// the rim sits on the wall.
pub fn bounce_off_wall(body: &Body, arena: &Arena) -> Result<WallContact, InvariantViolation> {
    let mut contact = reflect_in_place(body, arena)?;
    if contact.penetration > 0.0 {
        let normal = outward_normal(body, arena)?;
        contact.body.pos = arena.center + normal * (arena.radius - body.radius);
    }
    Ok(contact)
}

/// Reflect an outward-moving body without moving it
///
/// For a body that straddles the rim (it came through the gap edge and slid
/// sideways off the aperture). Projecting it would jump it inward by most of
/// its radius; it is turned around instead and drifts back in.
pub fn reflect_in_place(body: &Body, arena: &Arena) -> Result<WallContact, InvariantViolation> {
    let normal = outward_normal(body, arena)?;
    let dist = body.pos.distance(arena.center);
    let penetration = (dist + body.radius - arena.radius).max(0.0);

    let moving_out = body.vel.dot(normal) > 0.0;
    let vel = if moving_out {
        reflect_velocity(body.vel, normal)
    } else {
        body.vel
    };

    Ok(WallContact {
        body: body.with_vel(vel),
        reflected: moving_out,
        penetration,
    })
}
