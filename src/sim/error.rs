//! Error taxonomy for the simulation core
//!
//! Nothing in the core does I/O, so there are no retriable failures: a
//! `ConfigError` is fatal at construction time and an `InvariantViolation`
//! means a logic defect.

use std::fmt;

use glam::DVec2;

/// Invalid run configuration (detected before the first tick)
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Arena radius must be positive and finite
    InvalidArenaRadius(f64),
    /// Body radius must be positive and finite
    InvalidBodyRadius(f64),
    /// Base speed must be positive and finite
    InvalidBaseSpeed(f64),
    /// Spawn margin must be non-negative and finite
    InvalidSpawnMargin(f64),
    /// Gap half-width must be positive and finite
    InvalidGapHalfWidth(f64),
    /// Gap center offset must be finite
    InvalidGapOffset(f64),
    /// Viewport width and height must be positive and finite
    InvalidViewport { width: f64, height: f64 },
    /// Tick rate must be at least 1
    InvalidTickRate,
    /// No position inside the arena keeps the spawn margin from the wall
    ArenaTooSmall { arena_radius: f64, margin: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArenaRadius(r) => {
                write!(f, "arena radius must be positive and finite (got {})", r)
            }
            ConfigError::InvalidBodyRadius(r) => {
                write!(f, "body radius must be positive and finite (got {})", r)
            }
            ConfigError::InvalidBaseSpeed(s) => {
                write!(f, "base speed must be positive and finite (got {})", s)
            }
            ConfigError::InvalidSpawnMargin(m) => {
                write!(f, "spawn margin must be non-negative and finite (got {})", m)
            }
            ConfigError::InvalidGapHalfWidth(w) => {
                write!(f, "gap half-width must be positive and finite (got {})", w)
            }
            ConfigError::InvalidGapOffset(o) => {
                write!(f, "gap center offset must be finite (got {})", o)
            }
            ConfigError::InvalidViewport { width, height } => write!(
                f,
                "viewport must have positive, finite dimensions (got {}x{})",
                width, height
            ),
            ConfigError::InvalidTickRate => write!(f, "tick rate must be at least 1"),
            ConfigError::ArenaTooSmall {
                arena_radius,
                margin,
            } => write!(
                f,
                "arena radius {} leaves no room for bodies at spawn margin {}",
                arena_radius, margin
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A broken internal invariant; never recovered
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Outward normal requested for a body sitting exactly on the arena center
    DegenerateNormal { position: DVec2 },
    /// A body at the boundary matched no branch of the escape policy
    UnresolvedBoundary { position: DVec2 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DegenerateNormal { position } => write!(
                f,
                "outward normal undefined: body at ({}, {}) is on the arena center",
                position.x, position.y
            ),
            InvariantViolation::UnresolvedBoundary { position } => write!(
                f,
                "body at ({}, {}) reached the boundary but no policy branch handled it",
                position.x, position.y
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
