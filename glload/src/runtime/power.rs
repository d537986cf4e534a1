use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::sampling::PowerStatus;

const MAINS_BATTERY_LEVEL: i32 = 100;

/// Power state read from the Linux sysfs tree.
///
/// Queries are answered fresh on every call; nothing is cached. On other
/// platforms, or when the files are missing, the device reports mains power
/// with every mode flag off.
#[derive(Clone, Debug)]
pub struct SystemPower {
    sysfs: PathBuf,
}

impl Default for SystemPower {
    fn default() -> Self {
        Self::with_root("/sys")
    }
}

impl SystemPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads from an alternate sysfs mount.
    pub fn with_root(sysfs: impl Into<PathBuf>) -> Self {
        Self {
            sysfs: sysfs.into(),
        }
    }

    fn read(&self, relative: impl AsRef<Path>) -> Option<String> {
        if !cfg!(target_os = "linux") {
            return None;
        }

        fs::read_to_string(self.sysfs.join(relative))
            .ok()
            .map(|text| text.trim().to_string())
    }

    fn batteries(&self) -> Vec<PathBuf> {
        let dir = Path::new("class").join("power_supply");
        let Ok(entries) = fs::read_dir(self.sysfs.join(&dir)) else {
            return Vec::new();
        };

        let mut batteries: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| dir.join(entry.file_name()))
            .filter(|supply| {
                self.read(supply.join("type")).as_deref() == Some("Battery")
            })
            .collect();
        batteries.sort();
        batteries
    }
}

impl PowerStatus for SystemPower {
    fn battery_level(&self) -> i32 {
        let levels: Vec<i32> = self
            .batteries()
            .iter()
            .filter_map(|battery| self.read(battery.join("capacity")))
            .filter_map(|capacity| capacity.parse().ok())
            .collect();

        if levels.is_empty() {
            debug!("No battery found; reporting mains power");
            return MAINS_BATTERY_LEVEL;
        }

        levels.iter().sum::<i32>() / levels.len() as i32
    }

    fn power_save_mode(&self) -> bool {
        self.read("firmware/acpi/platform_profile").as_deref()
            == Some("low-power")
    }

    fn low_power_standby_enabled(&self) -> bool {
        self.read("power/mem_sleep")
            .is_some_and(|modes| modes.contains("[s2idle]"))
    }

    fn sustained_performance_supported(&self) -> bool {
        self.read(
            "devices/system/cpu/cpu0/cpufreq/scaling_available_governors",
        )
        .is_some_and(|governors| {
            governors.split_whitespace().any(|gov| gov == "performance")
        })
    }
}
