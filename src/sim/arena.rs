//! Arena, gap and viewport configuration
//!
//! Coordinates are screen-style: x grows right, y grows down, so the top of
//! the arena is at `center.y - radius`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which side of the arena the gap sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSide {
    #[default]
    Top,
    Bottom,
}

/// The opening in the arena wall
///
/// Modelled as a horizontal segment rather than an arc: a body is "in" the
/// gap when its x lies within `half_width` of the gap midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gap {
    /// Horizontal displacement of the gap midpoint from the arena center
    pub center_offset: f64,
    pub half_width: f64,
    pub side: GapSide,
}

impl Default for Gap {
    fn default() -> Self {
        Self {
            center_offset: 0.0,
            half_width: GAP_HALF_WIDTH,
            side: GapSide::Top,
        }
    }
}

/// Immutable circular arena for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub center: DVec2,
    pub radius: f64,
    pub gap: Gap,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            center: DVec2::new(ARENA_CENTER_X, ARENA_CENTER_Y),
            radius: ARENA_RADIUS,
            gap: Gap::default(),
        }
    }
}

impl Arena {
    pub fn new(center: DVec2, radius: f64, gap: Gap) -> Self {
        Self {
            center,
            radius,
            gap,
        }
    }

    /// X coordinate of the gap midpoint
    #[inline]
    pub fn gap_mid_x(&self) -> f64 {
        self.center.x + self.gap.center_offset
    }

    /// Y coordinate of the wall on the gap's side
    #[inline]
    pub fn gap_wall_y(&self) -> f64 {
        match self.gap.side {
            GapSide::Top => self.center.y - self.radius,
            GapSide::Bottom => self.center.y + self.radius,
        }
    }
}

/// Fixed rectangle (origin at top-left) outside which bodies are culled
///
/// Independent of the arena. Only bodies that passed through the gap can
/// ever leave it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a body center lies inside the viewport (edges inclusive)
    #[inline]
    pub fn contains(&self, pos: DVec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arena_matches_reference() {
        let arena = Arena::default();
        assert_eq!(arena.center, DVec2::new(400.0, 300.0));
        assert_eq!(arena.radius, 200.0);
        assert_eq!(arena.gap.half_width, 50.0);
        assert_eq!(arena.gap.side, GapSide::Top);
        assert_eq!(arena.gap_wall_y(), 100.0);
    }

    #[test]
    fn test_gap_wall_bottom() {
        let mut arena = Arena::default();
        arena.gap.side = GapSide::Bottom;
        arena.gap.center_offset = 20.0;
        assert_eq!(arena.gap_wall_y(), 500.0);
        assert_eq!(arena.gap_mid_x(), 420.0);
    }

    #[test]
    fn test_viewport_contains() {
        let vp = Viewport::default();
        assert!(vp.contains(DVec2::new(0.0, 0.0)));
        assert!(vp.contains(DVec2::new(800.0, 600.0)));
        assert!(!vp.contains(DVec2::new(-0.1, 300.0)));
        assert!(!vp.contains(DVec2::new(400.0, 600.1)));
    }

    #[test]
    fn test_gap_side_serde_names() {
        let json = serde_json::to_string(&GapSide::Bottom).unwrap();
        assert_eq!(json, "\"bottom\"");
        let side: GapSide = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(side, GapSide::Top);
    }
}
