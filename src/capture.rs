//! Frame capture
//!
//! Writes every presented frame to a run-scoped directory as
//! `frame_0000.json`, `frame_0001.json`, ... Each file holds the frame's draw
//! list plus the raw bodies, so it can be rasterized or replayed offline.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_NUMBER_DIGITS;
use crate::render::{DrawCommand, Frame, FrameSink, SinkError};
use crate::sim::Body;

/// On-disk contents of one captured frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedFrame {
    pub tick: u64,
    pub bodies: Vec<Body>,
    pub commands: Vec<DrawCommand>,
}

/// File name for the n-th captured frame
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{:0width$}.json", index, width = FRAME_NUMBER_DIGITS)
}

fn is_frame_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("frame_") && name.ends_with(".json"))
}

/// Sink that writes numbered frame files
#[derive(Debug)]
pub struct FrameRecorder {
    dir: PathBuf,
    next_index: u64,
}

impl FrameRecorder {
    /// Create `<parent>/<run_name>` and record into it
    ///
    /// Frame files left by an earlier run under the same name are deleted
    /// first, so the directory only ever holds this run's frames.
    pub fn new(parent: impl AsRef<Path>, run_name: &str) -> Result<Self, SinkError> {
        let dir = parent.as_ref().join(run_name);
        fs::create_dir_all(&dir)?;

        let mut stale = 0;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if is_frame_file(&path) {
                fs::remove_file(&path)?;
                stale += 1;
            }
        }
        if stale > 0 {
            log::warn!("Removed {} stale frames from {}", stale, dir.display());
        }

        log::info!("Capturing frames to {}", dir.display());
        Ok(Self { dir, next_index: 0 })
    }

    /// Directory name used for a seeded run
    pub fn run_name(seed: u64) -> String {
        format!("run_{}", seed)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far
    pub fn frames_written(&self) -> u64 {
        self.next_index
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(frame_file_name(index))
    }
}

impl FrameSink for FrameRecorder {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SinkError> {
        let captured = CapturedFrame {
            tick: frame.tick,
            bodies: frame.bodies.to_vec(),
            commands: frame.draw_commands(),
        };
        let path = self.frame_path(self.next_index);
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        serde_json::to_writer(&mut writer, &captured)?;
        writer.flush()?;

        log::trace!("Wrote {}", path.display());
        self.next_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    use crate::sim::Arena;

    #[test]
    fn test_frame_file_name_padding() {
        assert_eq!(frame_file_name(0), "frame_0000.json");
        assert_eq!(frame_file_name(42), "frame_0042.json");
        assert_eq!(frame_file_name(12345), "frame_12345.json");
    }

    #[test]
    fn test_recorder_writes_numbered_frames() {
        let parent =
            std::env::temp_dir().join(format!("gap-arena-capture-{}", std::process::id()));
        let mut recorder = FrameRecorder::new(&parent, &FrameRecorder::run_name(7)).unwrap();
        assert!(recorder.dir().ends_with("run_7"));

        let arena = Arena::default();
        let bodies = [Body::new(DVec2::new(400.0, 300.0), DVec2::new(5.0, 5.0), 15.0)];
        for tick in 1..=3 {
            recorder
                .present(&Frame {
                    tick,
                    arena: &arena,
                    bodies: &bodies,
                })
                .unwrap();
        }
        assert_eq!(recorder.frames_written(), 3);

        let json = fs::read_to_string(recorder.frame_path(2)).unwrap();
        let frame: CapturedFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.tick, 3);
        assert_eq!(frame.bodies, bodies.to_vec());
        assert_eq!(frame.commands.len(), 3);
        assert!(!recorder.frame_path(3).exists());

        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn test_recorder_clears_frames_from_earlier_run() {
        let parent = std::env::temp_dir().join(format!("gap-arena-stale-{}", std::process::id()));
        let arena = Arena::default();
        let frame = Frame {
            tick: 1,
            arena: &arena,
            bodies: &[],
        };

        let mut first = FrameRecorder::new(&parent, "run_1").unwrap();
        for _ in 0..3 {
            first.present(&frame).unwrap();
        }
        let notes = first.dir().join("notes.txt");
        fs::write(&notes, "keep").unwrap();

        let mut second = FrameRecorder::new(&parent, "run_1").unwrap();
        second.present(&frame).unwrap();
        assert!(second.frame_path(0).exists());
        assert!(!second.frame_path(1).exists());
        assert!(!second.frame_path(2).exists());
        assert!(notes.exists());

        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn test_captured_bodies_keep_exact_floats() {
        let body = Body::new(
            DVec2::new(435.41846652942957, 125.11159809168595),
            DVec2::new(-5.0, 5.0),
            15.0,
        );
        let json = serde_json::to_string(&body).unwrap();
        let back: Body = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pos.x.to_bits(), body.pos.x.to_bits());
        assert_eq!(back.pos.y.to_bits(), body.pos.y.to_bits());
    }
}
