//! Instant replay ring buffer
//!
//! Frames are recorded once per tick while play is live. Playback shows each
//! frame for `ticks_per_frame` ticks (half speed at 2).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub attacker: Vec2,
    pub defender: Vec2,
    pub ball: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayStep {
    Frame(ReplayFrame),
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayBuffer {
    frames: VecDeque<ReplayFrame>,
    capacity: usize,
    ticks_per_frame: u32,
    /// Playback tick counter; `None` when not playing
    cursor: Option<u32>,
}

impl ReplayBuffer {
    pub fn new(capacity: usize, ticks_per_frame: u32) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            ticks_per_frame: ticks_per_frame.max(1),
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Append a frame, dropping the oldest when full. Ignored during playback.
    pub fn record(&mut self, frame: ReplayFrame) {
        if self.is_playing() {
            return;
        }
        if self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Start playback; `false` when there is nothing to show.
    pub fn start(&mut self) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        self.cursor = Some(0);
        true
    }

    /// Advance playback by one tick.
    pub fn advance(&mut self) -> ReplayStep {
        let Some(tick) = self.cursor else {
            return ReplayStep::Finished;
        };
        let idx = (tick / self.ticks_per_frame) as usize;
        match self.frames.get(idx).copied() {
            Some(frame) => {
                self.cursor = Some(tick + 1);
                ReplayStep::Frame(frame)
            }
            None => {
                self.cursor = None;
                ReplayStep::Finished
            }
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = None;
    }
}
