use serde::{Deserialize, Serialize};

/// Frames between two power state samples.
pub const SAMPLE_INTERVAL_FRAMES: u32 = 180;

/// Source of the device power values fed into each rendered frame.
pub trait PowerStatus {
    /// Battery capacity in percent.
    fn battery_level(&self) -> i32;
    fn power_save_mode(&self) -> bool;
    fn low_power_standby_enabled(&self) -> bool;
    fn sustained_performance_supported(&self) -> bool;
}

impl<P: PowerStatus + ?Sized> PowerStatus for Box<P> {
    fn battery_level(&self) -> i32 {
        (**self).battery_level()
    }

    fn power_save_mode(&self) -> bool {
        (**self).power_save_mode()
    }

    fn low_power_standby_enabled(&self) -> bool {
        (**self).low_power_standby_enabled()
    }

    fn sustained_performance_supported(&self) -> bool {
        (**self).sustained_performance_supported()
    }
}

#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub struct PowerSnapshot {
    pub battery_level: i32,
    pub power_save_mode: bool,
    pub low_power_standby_enabled: bool,
    pub sustained_performance_supported: bool,
}

impl PowerSnapshot {
    pub fn query(status: &(impl PowerStatus + ?Sized)) -> Self {
        Self {
            battery_level: status.battery_level(),
            power_save_mode: status.power_save_mode(),
            low_power_standby_enabled: status.low_power_standby_enabled(),
            sustained_performance_supported: status
                .sustained_performance_supported(),
        }
    }
}

/// A fixed snapshot is its own power source.
impl PowerStatus for PowerSnapshot {
    fn battery_level(&self) -> i32 {
        self.battery_level
    }

    fn power_save_mode(&self) -> bool {
        self.power_save_mode
    }

    fn low_power_standby_enabled(&self) -> bool {
        self.low_power_standby_enabled
    }

    fn sustained_performance_supported(&self) -> bool {
        self.sustained_performance_supported
    }
}

/// Frame counter and latest power snapshot, owned by the render host.
///
/// The counter starts at 0 and then cycles through `1..=180`. The power
/// source is queried on the frame where the counter reaches 180, so a
/// fresh state resamples on frames 180, 360 and so on. Every other frame
/// reuses the stored snapshot, which starts out zeroed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SamplingState {
    frame: u32,
    snapshot: PowerSnapshot,
}

impl SamplingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn snapshot(&self) -> PowerSnapshot {
        self.snapshot
    }

    /// Advances one frame. Returns true when the snapshot was refreshed.
    pub fn advance(&mut self, status: &(impl PowerStatus + ?Sized)) -> bool {
        self.frame = if self.frame >= SAMPLE_INTERVAL_FRAMES {
            1
        } else {
            self.frame + 1
        };

        if self.frame < SAMPLE_INTERVAL_FRAMES {
            return false;
        }

        self.snapshot = PowerSnapshot::query(status);
        true
    }
}
