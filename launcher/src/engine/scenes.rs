use std::time::Duration;

use glload::prelude::SceneInfo;

pub const DEFAULT_DURATION_SECS: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneKind {
    /// Clears to a fixed color every frame.
    Clear { color: [f64; 3] },
    /// Clears to a color that breathes over time.
    Pulse { speed: f64 },
}

impl SceneKind {
    pub fn color_at(&self, elapsed: Duration) -> wgpu::Color {
        match *self {
            SceneKind::Clear { color: [r, g, b] } => {
                wgpu::Color { r, g, b, a: 1.0 }
            }
            SceneKind::Pulse { speed } => {
                let phase =
                    elapsed.as_secs_f64() * speed * std::f64::consts::TAU;
                let level = 0.5 + 0.5 * phase.sin();
                wgpu::Color {
                    r: level,
                    g: 0.2 * level,
                    b: 1.0 - level,
                    a: 1.0,
                }
            }
        }
    }
}

/// Scenes offered by the demo engine, with their options.
pub fn catalogue() -> Vec<SceneInfo> {
    vec![
        SceneInfo::new("clear")
            .with_option("duration", "Seconds to run the scene", "5.0", &[])
            .with_option(
                "color",
                "Clear color",
                "black",
                &["black", "white", "red", "green", "blue"],
            ),
        SceneInfo::new("pulse")
            .with_option("duration", "Seconds to run the scene", "5.0", &[])
            .with_option("speed", "Pulses per second", "0.5", &[]),
    ]
}

/// Builds a scene from its name and `key=value` options. Unknown options
/// and unparsable values fall back to the defaults.
pub fn build(name: &str, options: &[(String, String)]) -> Option<SceneKind> {
    let option = |key: &str| {
        options
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    };

    match name {
        "clear" => {
            let color = match option("color").unwrap_or("black") {
                "white" => [1.0, 1.0, 1.0],
                "red" => [1.0, 0.0, 0.0],
                "green" => [0.0, 1.0, 0.0],
                "blue" => [0.0, 0.0, 1.0],
                _ => [0.0, 0.0, 0.0],
            };
            Some(SceneKind::Clear { color })
        }
        "pulse" => {
            let speed = option("speed")
                .and_then(|speed| speed.parse().ok())
                .filter(|speed: &f64| speed.is_finite() && *speed > 0.0)
                .unwrap_or(0.5);
            Some(SceneKind::Pulse { speed })
        }
        _ => None,
    }
}
