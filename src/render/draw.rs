//! Draw-command generation for one frame
//!
//! Backend-agnostic: a frame is the arena outline, a rectangle hiding the wall
//! where the gap is, and one filled ellipse per body.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Arena, Body, GapSide};

/// Stroke width of the arena outline
pub const OUTLINE_WIDTH: f64 = 2.0;

pub const BACKGROUND_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const WALL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const BODY_COLOR: [f32; 4] = [1.0, 0.3, 0.2, 1.0];

/// One primitive for a drawing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Unfilled circle
    CircleOutline {
        center: DVec2,
        radius: f64,
        width: f64,
        color: [f32; 4],
    },
    /// Filled axis-aligned rectangle, `min` is the top-left corner
    Rect {
        min: DVec2,
        size: DVec2,
        color: [f32; 4],
    },
    /// Filled ellipse inscribed in the box `min .. min + size`
    Ellipse {
        min: DVec2,
        size: DVec2,
        color: [f32; 4],
    },
}

/// Rectangle covering the wall across the gap's horizontal extent
///
/// The wall curves away from the tangent line, so the rectangle is tall enough
/// to cover the circle's sagitta at the gap edges.
pub fn gap_occluder(arena: &Arena) -> DrawCommand {
    let r = arena.radius;
    let hw = arena.gap.half_width;
    let far_dx = (arena.gap.center_offset.abs() + hw).min(r);
    let sagitta = r - (r * r - far_dx * far_dx).sqrt();
    let height = sagitta + 2.0 * OUTLINE_WIDTH;

    let top = match arena.gap.side {
        GapSide::Top => arena.gap_wall_y() - OUTLINE_WIDTH,
        GapSide::Bottom => arena.gap_wall_y() + OUTLINE_WIDTH - height,
    };

    DrawCommand::Rect {
        min: DVec2::new(arena.gap_mid_x() - hw, top),
        size: DVec2::new(2.0 * hw, height),
        color: BACKGROUND_COLOR,
    }
}

/// Filled ellipse bounded by the body's position and radius
pub fn body_ellipse(body: &Body) -> DrawCommand {
    DrawCommand::Ellipse {
        min: body.pos - DVec2::splat(body.radius),
        size: DVec2::splat(2.0 * body.radius),
        color: BODY_COLOR,
    }
}

/// All draw commands for one frame, back to front
pub fn draw_frame(arena: &Arena, bodies: &[Body]) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(bodies.len() + 2);
    commands.push(DrawCommand::CircleOutline {
        center: arena.center,
        radius: arena.radius,
        width: OUTLINE_WIDTH,
        color: WALL_COLOR,
    });
    commands.push(gap_occluder(arena));
    commands.extend(bodies.iter().map(body_ellipse));
    commands
}
