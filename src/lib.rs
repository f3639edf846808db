//! Gap Arena - bodies bouncing inside a circular arena with a hole in the wall
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, reflection, escape policies, tick)
//! - `settings`: Run configuration (JSON, validated once at startup)
//! - `render`: Frame sink contract and draw-command generation
//! - `capture`: Numbered frame capture to disk
//! - `driver`: Fixed-rate driver that owns the state and the RNG

pub mod capture;
pub mod driver;
pub mod render;
pub mod settings;
pub mod sim;

pub use driver::{Driver, Pacer, QuitSignal};
pub use settings::{CaptureConfig, SimulationConfig};

/// Reference tuning constants
///
/// Speed and radius are tuned for `TICK_RATE`; changing the rate without
/// rescaling `BASE_SPEED` changes simulated behavior.
pub mod consts {
    /// Ticks per second the physics constants are tuned for
    pub const TICK_RATE: u32 = 60;
    /// Maximum ticks the driver catches up in one poll to prevent spiral of death
    pub const MAX_CATCH_UP_TICKS: u32 = 8;

    /// Arena defaults (screen coordinates, y grows downward)
    pub const ARENA_CENTER_X: f64 = 400.0;
    pub const ARENA_CENTER_Y: f64 = 300.0;
    pub const ARENA_RADIUS: f64 = 200.0;
    pub const GAP_HALF_WIDTH: f64 = 50.0;

    /// Body defaults
    pub const BODY_RADIUS: f64 = 15.0;
    /// Per-tick displacement along each axis
    pub const BASE_SPEED: f64 = 5.0;

    /// Viewport used by the off-screen cleanup rule (the reference window size)
    pub const VIEWPORT_WIDTH: f64 = 800.0;
    pub const VIEWPORT_HEIGHT: f64 = 600.0;

    /// Zero padding of captured frame numbers
    pub const FRAME_NUMBER_DIGITS: usize = 4;
}
