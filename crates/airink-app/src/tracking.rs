//! Tracking sources: where hand landmarks come from.
//!
//! The landmark detector itself is an external collaborator. The shell only
//! needs something that hands it one optional `LandmarkFrame` per frame, so
//! recorded sessions (or the built-in demo recording) stand in for a live
//! detector.

use airink_core::landmark::{index, Landmark, LandmarkFrame, LANDMARK_COUNT};
use std::path::Path;
use thiserror::Error;

/// Errors loading a recorded tracking session.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed recording: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies one hand observation per frame.
///
/// The outer `None` means the stream has ended; `Some(None)` is a frame on
/// which tracking was lost. The engine contract requires pulling at most one
/// frame per processed frame, which the shell's redraw loop guarantees.
pub trait TrackingSource {
    fn next_frame(&mut self) -> Option<Option<LandmarkFrame>>;
}

/// Plays back a recorded sequence of landmark frames.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<Option<LandmarkFrame>>,
    cursor: usize,
    looping: bool,
}

impl ReplaySource {
    /// Wrap an in-memory recording.
    pub fn from_frames(frames: Vec<Option<LandmarkFrame>>) -> Self {
        Self {
            frames,
            cursor: 0,
            looping: false,
        }
    }

    /// Load a recording from a JSON file: an array of either `null`
    /// (tracking lost) or 21-element landmark arrays.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TrackingError> {
        let json = std::fs::read_to_string(path)?;
        let frames: Vec<Option<LandmarkFrame>> = serde_json::from_str(&json)?;
        log::info!("loaded recording with {} frame(s)", frames.len());
        Ok(Self::from_frames(frames))
    }

    /// Restart from the beginning when the recording runs out.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// A deterministic synthetic recording: a hand sweeping the surface,
    /// closing into a pinch partway through, with a brief tracking dropout.
    pub fn demo() -> Self {
        let mut frames = Vec::with_capacity(620);
        for i in 0..600usize {
            let t = i as f64 / 60.0;
            let x = 0.5 + 0.32 * (t * 1.1).cos();
            let y = 0.45 + 0.28 * (t * 0.7).sin();
            let pinched = (300..420).contains(&i);
            frames.push(Some(demo_hand(x, y, pinched)));
            if i % 200 == 199 {
                frames.push(None);
            }
        }
        Self::from_frames(frames).looping()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TrackingSource for ReplaySource {
    fn next_frame(&mut self) -> Option<Option<LandmarkFrame>> {
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Some(frame)
    }
}

/// A plausible open hand with the index tip at normalized (x, y).
fn demo_hand(x: f64, y: f64, pinched: bool) -> LandmarkFrame {
    let mut p = [Landmark::default(); LANDMARK_COUNT];
    p[index::INDEX_FINGER_TIP] = Landmark::new(x, y, 0.0);
    p[index::INDEX_FINGER_PIP] = Landmark::new(x, y - 0.08, 0.0);
    p[index::THUMB_TIP] = if pinched {
        Landmark::new(x, y, 0.0)
    } else {
        Landmark::new(x - 0.10, y + 0.05, 0.0)
    };
    p[index::MIDDLE_FINGER_MCP] = Landmark::new(x + 0.03, y + 0.10, 0.0);
    p[index::MIDDLE_FINGER_TIP] = Landmark::new(x + 0.03, y + 0.15, 0.0);
    p[index::RING_FINGER_PIP] = Landmark::new(x + 0.06, y - 0.05, 0.0);
    p[index::RING_FINGER_TIP] = Landmark::new(x + 0.06, y + 0.02, 0.0);
    LandmarkFrame::new(p)
}
