mod scenes;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use glload::prelude::*;
use glload::runtime::storage;

pub use scenes::catalogue;
use scenes::{DEFAULT_DURATION_SECS, SceneKind};

/// One `-b NAME[:key=value...]` request from the launch arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Benchmark {
    pub scene: String,
    pub options: Vec<(String, String)>,
}

impl Benchmark {
    pub fn parse(spec: &str) -> Self {
        let mut parts = spec.split(':');
        let scene = parts.next().unwrap_or_default().to_string();
        let options = parts
            .filter_map(|part| part.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self { scene, options }
    }

    pub fn duration(&self) -> Duration {
        let secs = self
            .options
            .iter()
            .rev()
            .find(|(key, _)| key == "duration")
            .and_then(|(_, value)| value.parse::<f32>().ok())
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok());
        secs.unwrap_or(Duration::from_secs_f32(DEFAULT_DURATION_SECS))
    }

    fn describe(&self) -> String {
        let options: Vec<String> = self
            .options
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if options.is_empty() {
            return format!("[{}]", self.scene);
        }
        format!("[{}] {}", self.scene, options.join(":"))
    }
}

/// Benchmarks named by `-b`/`--benchmark` tokens. Without any, every
/// catalogued scene runs with default options.
pub fn parse_benchmarks(args: &str) -> Vec<Benchmark> {
    let mut tokens = args.split_whitespace();
    let mut benchmarks = Vec::new();

    while let Some(token) = tokens.next() {
        if token == "-b" || token == "--benchmark" {
            if let Some(spec) = tokens.next() {
                benchmarks.push(Benchmark::parse(spec));
            }
        }
    }

    if benchmarks.is_empty() {
        benchmarks = catalogue()
            .into_iter()
            .map(|info| Benchmark {
                scene: info.name,
                options: Vec::new(),
            })
            .collect();
    }

    benchmarks
}

struct ActiveScene {
    benchmark: Benchmark,
    kind: SceneKind,
    duration: Duration,
    started: Instant,
    frames: u32,
}

impl ActiveScene {
    fn average_fps(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed.is_zero() {
            return 0.0;
        }
        f64::from(self.frames) / elapsed.as_secs_f64()
    }
}

/// Formats one results log record.
pub fn result_line(
    timestamp: &str,
    description: &str,
    fps: f64,
    power: &PowerSnapshot,
) -> String {
    let frame_time = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
    format!(
        "{} {} FPS: {:.0} FrameTime: {:.3} ms bat: {} lpm: {}",
        timestamp,
        description,
        fps,
        frame_time,
        power.battery_level,
        u8::from(power.power_save_mode)
    )
}

/// Runs the requested scenes back to back, one clear pass per frame.
#[derive(Default)]
pub struct DemoEngine {
    surface: Option<GpuSurface>,
    pending: VecDeque<Benchmark>,
    active: Option<ActiveScene>,
    results_log: PathBuf,
}

impl DemoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // Starts the next runnable benchmark; unknown scenes are logged and
    // skipped.
    fn start_next(&mut self) -> bool {
        while let Some(benchmark) = self.pending.pop_front() {
            let Some(kind) = scenes::build(&benchmark.scene, &benchmark.options)
            else {
                warn!("Unknown scene '{}'; skipping", benchmark.scene);
                self.record(&format!("{} Unsupported", benchmark.describe()));
                continue;
            };

            info!("{}", benchmark.describe());
            self.active = Some(ActiveScene {
                duration: benchmark.duration(),
                benchmark,
                kind,
                started: Instant::now(),
                frames: 0,
            });
            return true;
        }

        self.active = None;
        false
    }

    fn finish_active(&mut self, power: &PowerSnapshot) {
        let Some(active) = self.active.take() else {
            return;
        };

        let fps = active.average_fps(Instant::now());
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = result_line(
            &timestamp.to_string(),
            &active.benchmark.describe(),
            fps,
            power,
        );
        info!("{}", line);
        self.record(&line);
    }

    fn record(&self, line: &str) {
        if let Err(err) = storage::append_result(&self.results_log, line) {
            warn!(
                "Failed to write results log {}: {}",
                self.results_log.display(),
                err
            );
        }
    }
}

impl ConfigScorer for DemoEngine {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32 {
        MatchScorer.score(candidate, target)
    }
}

impl RenderEngine for DemoEngine {
    type Surface = GpuSurface;

    fn init(
        &mut self,
        surface: GpuSurface,
        _assets: &AssetSource,
        args: &str,
        results_log: &Path,
    ) {
        info!(
            "Surface {:?} with depth/stencil {:?}",
            surface.format(),
            surface.depth_stencil_format()
        );
        self.surface = Some(surface);
        self.results_log = results_log.to_path_buf();
        self.pending = parse_benchmarks(args).into();
        self.start_next();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
    }

    fn render(&mut self, power: PowerSnapshot) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let elapsed = active.started.elapsed();
        match surface.present_clear(active.kind.color_at(elapsed)) {
            Ok(true) => active.frames += 1,
            Ok(false) => {}
            Err(err) => {
                error!("Render failed: {}", err);
                return false;
            }
        }

        if elapsed < active.duration {
            return true;
        }

        self.finish_active(&power);
        self.start_next()
    }

    fn done(&mut self) {
        self.active = None;
        self.pending.clear();
        self.surface = None;
        debug!("Demo engine released its surface");
    }

    fn scene_info(
        &self,
        _assets: &AssetSource,
        _results_log: &Path,
    ) -> Vec<SceneInfo> {
        catalogue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmarks_come_from_b_tokens() {
        let benchmarks = parse_benchmarks(
            "-b clear:duration=2:color=red --visual-config r=8 \
             --benchmark pulse",
        );

        assert_eq!(benchmarks.len(), 2);
        assert_eq!(benchmarks[0].scene, "clear");
        assert_eq!(benchmarks[0].duration(), Duration::from_secs(2));
        assert_eq!(
            benchmarks[0].options[1],
            ("color".to_string(), "red".to_string())
        );
        assert_eq!(benchmarks[1].scene, "pulse");
    }

    #[test]
    fn no_benchmarks_runs_whole_catalogue() {
        let scenes: Vec<String> = parse_benchmarks("--visual-config d=24")
            .into_iter()
            .map(|benchmark| benchmark.scene)
            .collect();
        assert_eq!(scenes, vec!["clear", "pulse"]);
    }

    #[test]
    fn bad_duration_falls_back_to_default() {
        let benchmark = Benchmark::parse("clear:duration=soon");
        assert_eq!(
            benchmark.duration(),
            Duration::from_secs_f32(DEFAULT_DURATION_SECS)
        );
    }

    #[test]
    fn oversized_duration_falls_back_to_default() {
        for spec in ["clear:duration=1e30", "clear:duration=inf"] {
            assert_eq!(
                Benchmark::parse(spec).duration(),
                Duration::from_secs_f32(DEFAULT_DURATION_SECS)
            );
        }
    }

    #[test]
    fn result_line_reports_fps_and_power() {
        let power = PowerSnapshot {
            battery_level: 64,
            power_save_mode: true,
            ..PowerSnapshot::default()
        };

        let line = result_line(
            "2026-01-01 00:00:00",
            "[clear] duration=2",
            50.0,
            &power,
        );
        assert_eq!(
            line,
            "2026-01-01 00:00:00 [clear] duration=2 FPS: 50 \
             FrameTime: 20.000 ms bat: 64 lpm: 1"
        );
    }

    #[test]
    fn unknown_scenes_are_recorded_and_skipped() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut engine = DemoEngine {
            results_log: dir.path().join("gpu_result.log"),
            pending: parse_benchmarks("-b terrain -b clear").into(),
            ..DemoEngine::default()
        };

        assert!(engine.start_next());
        assert_eq!(
            engine.active.as_ref().map(|a| a.benchmark.scene.as_str()),
            Some("clear")
        );

        let log = storage::read_results_log(&engine.results_log)
            .expect("read results log");
        assert_eq!(log, vec!["[terrain] Unsupported".to_string()]);
    }

    #[test]
    fn render_without_scene_ends_session() {
        let mut engine = DemoEngine::new();
        assert!(!engine.render(PowerSnapshot::default()));
    }
}
