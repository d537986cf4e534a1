use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_INTERVALS: usize = 90;

/// Measures the pace of delivered frames.
///
/// The render loop is push-driven, so the clock never decides when to
/// render; it only records when frames actually happened.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    last_frame: Option<Instant>,
    frame_intervals: VecDeque<Duration>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_frame: None,
            frame_intervals: VecDeque::with_capacity(MAX_INTERVALS),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn record(&mut self, now: Instant) {
        self.frame_count += 1;

        if let Some(last) = self.last_frame {
            self.frame_intervals
                .push_back(now.saturating_duration_since(last));
            if self.frame_intervals.len() > MAX_INTERVALS {
                self.frame_intervals.pop_front();
            }
        }

        self.last_frame = Some(now);
    }

    /// Forgets the last frame time so a pause does not show up as one long
    /// frame. The frame count and interval history are kept.
    pub fn reset_timing(&mut self) {
        self.last_frame = None;
    }

    pub fn last_interval(&self) -> Option<Duration> {
        self.frame_intervals.back().copied()
    }

    pub fn average_fps(&self) -> f32 {
        if self.frame_intervals.is_empty() {
            return 0.0;
        }

        let sum: Duration = self.frame_intervals.iter().copied().sum();
        let avg = sum / self.frame_intervals.len() as u32;

        if avg.is_zero() {
            return 0.0;
        }

        1.0 / avg.as_secs_f32()
    }
}
