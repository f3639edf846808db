//! Frame sinks
//!
//! The simulation does not draw. Once per tick the driver hands the current
//! bodies to a `FrameSink`, which may draw them, record them, or ignore them.

pub mod draw;

use std::fmt;

pub use draw::{DrawCommand, body_ellipse, draw_frame, gap_occluder};

use crate::sim::{Arena, Body};

/// Read-only snapshot of one tick
///
/// Borrowed for the duration of `present`; sinks that need the bodies later
/// must copy them.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Number of completed ticks
    pub tick: u64,
    pub arena: &'a Arena,
    pub bodies: &'a [Body],
}

impl Frame<'_> {
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        draw_frame(self.arena, self.bodies)
    }
}

/// Errors a sink can report back to the driver
#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io(e) => write!(f, "Frame I/O error: {}", e),
            SinkError::Encode(e) => write!(f, "Frame encoding error: {}", e),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(e) => Some(e),
            SinkError::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e)
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        SinkError::Encode(e)
    }
}

/// Consumer of one frame per tick
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SinkError>;
}

/// Sink that discards every frame (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that keeps the draw list of the most recent frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub tick: u64,
    pub commands: Vec<DrawCommand>,
    pub frames_presented: u64,
}

impl FrameSink for DrawList {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SinkError> {
        self.tick = frame.tick;
        self.commands = frame.draw_commands();
        self.frames_presented += 1;
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SinkError> {
        (**self).present(frame)
    }
}
