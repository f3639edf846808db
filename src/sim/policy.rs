//! Escape policies
//!
//! What happens to a body whose rim has reached the wall. Off the gap, every
//! policy bounces; in the gap they differ:
//! - `BounceAndDuplicate`: the body is removed and two fresh bodies spawn
//! - `PassThrough`: the body keeps its heading and leaves the arena
//! - `Absorb`: the body is removed with no replacement
//!
//! The tick only sees the `EscapePolicy` trait, so the variant is chosen by
//! configuration (`PolicyKind`) rather than by separate loops.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{bounce_off_wall, reflect_in_place};
use super::error::InvariantViolation;
use super::geometry::{is_beyond_wall, is_in_gap};
use super::spawn::Spawner;

/// Outcome for one body at the boundary: zero, one or two bodies survive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Body stays in the arena; `reflected` is false if it was already heading inward
    Bounced { body: Body, reflected: bool },
    /// Body continues on its current heading through the gap
    PassedThrough(Body),
    /// Body is gone
    Removed,
    /// Body is gone, replaced by two freshly spawned bodies
    Split([Body; 2]),
}

impl Resolution {
    /// Bodies that survive this resolution
    pub fn bodies(&self) -> &[Body] {
        match self {
            Resolution::Bounced { body, .. } | Resolution::PassedThrough(body) => {
                std::slice::from_ref(body)
            }
            Resolution::Removed => &[],
            Resolution::Split(pair) => pair,
        }
    }
}

/// Decision applied to a body whose far edge has reached the wall
pub trait EscapePolicy {
    /// Resolve `body` (already integrated for this tick)
    ///
    /// `rng` is only drawn from when bodies have to be spawned.
    fn resolve<R: Rng + ?Sized>(
        &self,
        body: &Body,
        spawner: &Spawner,
        rng: &mut R,
    ) -> Result<Resolution, InvariantViolation>;
}

fn bounce(body: &Body, spawner: &Spawner) -> Result<Resolution, InvariantViolation> {
    let contact = bounce_off_wall(body, spawner.arena())?;
    Ok(Resolution::Bounced {
        body: contact.body,
        reflected: contact.reflected,
    })
}

/// Escaping through the gap always splits into two new bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct BounceAndDuplicate;

impl EscapePolicy for BounceAndDuplicate {
    fn resolve<R: Rng + ?Sized>(
        &self,
        body: &Body,
        spawner: &Spawner,
        rng: &mut R,
    ) -> Result<Resolution, InvariantViolation> {
        if is_in_gap(body, spawner.arena()) {
            let first = spawner.spawn(rng);
            let second = spawner.spawn(rng);
            return Ok(Resolution::Split([first, second]));
        }
        bounce(body, spawner)
    }
}

/// Bodies in the gap fly out unchanged and are culled later by the viewport
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl EscapePolicy for PassThrough {
    fn resolve<R: Rng + ?Sized>(
        &self,
        body: &Body,
        spawner: &Spawner,
        _rng: &mut R,
    ) -> Result<Resolution, InvariantViolation> {
        let arena = spawner.arena();
        // Once the center is past the wall the body is outside the arena for good
        if is_in_gap(body, arena) || is_beyond_wall(body, arena) {
            return Ok(Resolution::PassedThrough(*body));
        }
        // Rim already over the wall before this move: it slid off the gap edge
        let previous = body.pos - body.vel;
        if previous.distance(arena.center) + body.radius > arena.radius {
            let contact = reflect_in_place(body, arena)?;
            return Ok(Resolution::Bounced {
                body: contact.body,
                reflected: contact.reflected,
            });
        }
        bounce(body, spawner)
    }
}

/// Bodies in the gap are removed outright
#[derive(Debug, Clone, Copy, Default)]
pub struct Absorb;

impl EscapePolicy for Absorb {
    fn resolve<R: Rng + ?Sized>(
        &self,
        body: &Body,
        spawner: &Spawner,
        _rng: &mut R,
    ) -> Result<Resolution, InvariantViolation> {
        if is_in_gap(body, spawner.arena()) {
            return Ok(Resolution::Removed);
        }
        bounce(body, spawner)
    }
}

/// Policy selection as configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    BounceAndDuplicate,
    PassThrough,
    Absorb,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::BounceAndDuplicate => "bounce_and_duplicate",
            PolicyKind::PassThrough => "pass_through",
            PolicyKind::Absorb => "absorb",
        }
    }

}

impl FromStr for PolicyKind {
    type Err = String;

    /// Case-insensitive, `-` and `_` interchangeable, plus short aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bounce_and_duplicate" | "duplicate" | "bounce" => Ok(PolicyKind::BounceAndDuplicate),
            "pass_through" | "passthrough" | "pass" => Ok(PolicyKind::PassThrough),
            "absorb" | "remove" => Ok(PolicyKind::Absorb),
            _ => Err(format!(
                "unknown policy '{}' (expected bounce_and_duplicate, pass_through or absorb)",
                s
            )),
        }
    }
}

impl EscapePolicy for PolicyKind {
    fn resolve<R: Rng + ?Sized>(
        &self,
        body: &Body,
        spawner: &Spawner,
        rng: &mut R,
    ) -> Result<Resolution, InvariantViolation> {
        match self {
            PolicyKind::BounceAndDuplicate => BounceAndDuplicate.resolve(body, spawner, rng),
            PolicyKind::PassThrough => PassThrough.resolve(body, spawner, rng),
            PolicyKind::Absorb => Absorb.resolve(body, spawner, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::sim::arena::Arena;

    fn spawner() -> Spawner {
        Spawner::new(Arena::default(), 15.0, 5.0, None).unwrap()
    }

    /// On the top wall, inside the gap
    fn gap_body() -> Body {
        Body::new(DVec2::new(395.0, 95.0), DVec2::new(-5.0, -5.0), 15.0)
    }

    /// On the right wall, far from the gap
    fn wall_body() -> Body {
        Body::new(DVec2::new(590.0, 300.0), DVec2::new(5.0, -5.0), 15.0)
    }

    #[test]
    fn test_duplicate_splits_in_gap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let res = BounceAndDuplicate
            .resolve(&gap_body(), &spawner(), &mut rng)
            .unwrap();
        let Resolution::Split(pair) = res else {
            panic!("expected split, got {:?}", res);
        };
        for b in pair {
            assert_eq!(b.radius, 15.0);
            assert_eq!(b.vel.x.abs(), 5.0);
            assert_eq!(b.vel.y.abs(), 5.0);
        }
        assert_eq!(res.bodies().len(), 2);
    }

    #[test]
    fn test_pass_through_keeps_velocity_in_gap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let res = PassThrough.resolve(&gap_body(), &spawner(), &mut rng).unwrap();
        assert_eq!(res, Resolution::PassedThrough(gap_body()));
    }

    #[test]
    fn test_absorb_removes_in_gap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let res = Absorb.resolve(&gap_body(), &spawner(), &mut rng).unwrap();
        assert_eq!(res, Resolution::Removed);
        assert!(res.bodies().is_empty());
    }

    #[test]
    fn test_all_policies_bounce_off_gap() {
        let s = spawner();
        for kind in [
            PolicyKind::BounceAndDuplicate,
            PolicyKind::PassThrough,
            PolicyKind::Absorb,
        ] {
            let mut rng = Pcg32::seed_from_u64(1);
            let res = kind.resolve(&wall_body(), &s, &mut rng).unwrap();
            match res {
                Resolution::Bounced { body, reflected } => {
                    assert!(reflected, "{:?} should reflect", kind);
                    assert!((body.vel - DVec2::new(-5.0, -5.0)).length() < 1e-12);
                }
                other => panic!("{:?} produced {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_pass_through_ignores_wall_once_outside() {
        // Center above the wall but drifted sideways out of the gap's x-range
        let body = Body::new(DVec2::new(460.0, 60.0), DVec2::new(5.0, -5.0), 15.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let res = PassThrough.resolve(&body, &spawner(), &mut rng).unwrap();
        assert_eq!(res, Resolution::PassedThrough(body));
    }

    #[test]
    fn test_pass_through_turns_back_at_gap_edge_without_jumping() {
        // Crossed at the gap's right edge, then slid past it with the center
        // still inside the wall
        let body = Body::new(DVec2::new(455.0, 110.0), DVec2::new(5.0, -5.0), 15.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let res = PassThrough.resolve(&body, &spawner(), &mut rng).unwrap();
        let Resolution::Bounced { body: next, reflected } = res else {
            panic!("expected bounce, got {:?}", res);
        };
        assert!(reflected);
        assert_eq!(next.pos, body.pos);
        assert!(next.vel.y > 0.0);
        assert!((next.speed() - body.speed()).abs() < 1e-9);
    }

    #[test]
    fn test_policy_kind_parsing() {
        assert_eq!("pass-through".parse::<PolicyKind>(), Ok(PolicyKind::PassThrough));
        assert_eq!("pass".parse::<PolicyKind>(), Ok(PolicyKind::PassThrough));
        assert_eq!("Duplicate".parse::<PolicyKind>(), Ok(PolicyKind::BounceAndDuplicate));
        assert_eq!("bounce".parse::<PolicyKind>(), Ok(PolicyKind::BounceAndDuplicate));
        assert_eq!("remove".parse::<PolicyKind>(), Ok(PolicyKind::Absorb));
        assert!("teleport".parse::<PolicyKind>().is_err());
        for kind in [
            PolicyKind::BounceAndDuplicate,
            PolicyKind::PassThrough,
            PolicyKind::Absorb,
        ] {
            assert_eq!(kind.as_str().parse::<PolicyKind>(), Ok(kind));
        }
    }
}
