#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glload::prelude::*;

pub fn gpu_tests_enabled() -> bool {
    matches!(
        env::var("GLLOAD_RUN_GPU_TESTS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Display platform over a fixed candidate list. Configs are indices.
#[derive(Default)]
pub struct MockPlatform {
    pub configs: Vec<VisualConfig>,
    pub fail_query: bool,
    pub fetch_nothing: bool,
    pub last_filter: RefCell<Option<ConfigFilter>>,
    pub created: Vec<usize>,
}

impl MockPlatform {
    pub fn with_configs(configs: Vec<VisualConfig>) -> Self {
        Self {
            configs,
            ..Self::default()
        }
    }
}

impl DisplayPlatform for MockPlatform {
    type Config = usize;
    type Surface = usize;

    fn count_configs(&self, filter: &ConfigFilter) -> Result<usize> {
        *self.last_filter.borrow_mut() = Some(filter.clone());
        if self.fail_query {
            return Err(GlloadError::ConfigQuery("driver lost".to_string()));
        }
        Ok(self.configs.len())
    }

    fn fetch_configs(
        &self,
        _filter: &ConfigFilter,
        max: usize,
    ) -> Result<Vec<usize>> {
        if self.fetch_nothing {
            return Ok(Vec::new());
        }
        Ok((0..self.configs.len()).take(max).collect())
    }

    fn config_attrib(
        &self,
        config: &usize,
        attrib: ConfigAttrib,
    ) -> Option<u32> {
        let visual = self.configs.get(*config)?;
        match attrib {
            ConfigAttrib::RedSize => Some(visual.red),
            ConfigAttrib::GreenSize => Some(visual.green),
            ConfigAttrib::BlueSize => Some(visual.blue),
            ConfigAttrib::AlphaSize => Some(visual.alpha),
            ConfigAttrib::DepthSize => Some(visual.depth),
            ConfigAttrib::StencilSize => Some(visual.stencil),
            // Buffer size is unreadable on this platform.
            ConfigAttrib::BufferSize => None,
            ConfigAttrib::RenderableType => Some(RenderApi::Gles2.bit()),
        }
    }

    fn create_surface(&mut self, config: &usize) -> Result<usize> {
        self.created.push(*config);
        Ok(*config)
    }
}

/// Scores a candidate by its red size and counts calls.
#[derive(Default)]
pub struct RedScorer {
    pub calls: Cell<usize>,
}

impl ConfigScorer for RedScorer {
    fn score(&self, candidate: &VisualConfig, _target: &VisualConfig) -> i32 {
        self.calls.set(self.calls.get() + 1);
        candidate.red as i32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Init {
        surface: u32,
        args: String,
        results_log: PathBuf,
    },
    Resize(u32, u32),
    Render(PowerSnapshot),
    Done,
}

pub type EngineLog = Rc<RefCell<Vec<EngineCall>>>;

/// Engine that records every call and can ask to stop after N frames.
pub struct MockEngine {
    pub log: EngineLog,
    pub stop_on_frame: Option<usize>,
    frames: usize,
}

impl MockEngine {
    pub fn recording() -> (Self, EngineLog) {
        let log = EngineLog::default();
        (
            Self {
                log: log.clone(),
                stop_on_frame: None,
                frames: 0,
            },
            log,
        )
    }

    pub fn stopping_on(frame: usize) -> (Self, EngineLog) {
        let (mut engine, log) = Self::recording();
        engine.stop_on_frame = Some(frame);
        (engine, log)
    }
}

impl ConfigScorer for MockEngine {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32 {
        MatchScorer.score(candidate, target)
    }
}

impl RenderEngine for MockEngine {
    type Surface = u32;

    fn init(
        &mut self,
        surface: u32,
        _assets: &AssetSource,
        args: &str,
        results_log: &Path,
    ) {
        self.log.borrow_mut().push(EngineCall::Init {
            surface,
            args: args.to_string(),
            results_log: results_log.to_path_buf(),
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().push(EngineCall::Resize(width, height));
    }

    fn render(&mut self, power: PowerSnapshot) -> bool {
        self.frames += 1;
        self.log.borrow_mut().push(EngineCall::Render(power));
        self.stop_on_frame != Some(self.frames)
    }

    fn done(&mut self) {
        self.log.borrow_mut().push(EngineCall::Done);
    }
}

pub fn renders(log: &EngineLog) -> Vec<PowerSnapshot> {
    log.borrow()
        .iter()
        .filter_map(|call| match call {
            EngineCall::Render(power) => Some(*power),
            _ => None,
        })
        .collect()
}

pub fn count_calls(log: &EngineLog, wanted: &EngineCall) -> usize {
    log.borrow().iter().filter(|call| *call == wanted).count()
}

/// Power source whose answers can be changed between frames. Counts how
/// often it was queried.
#[derive(Clone, Default)]
pub struct ScriptedPower {
    pub current: Rc<Cell<PowerSnapshot>>,
    pub queries: Rc<Cell<usize>>,
}

impl PowerStatus for ScriptedPower {
    fn battery_level(&self) -> i32 {
        self.queries.set(self.queries.get() + 1);
        self.current.get().battery_level
    }

    fn power_save_mode(&self) -> bool {
        self.current.get().power_save_mode
    }

    fn low_power_standby_enabled(&self) -> bool {
        self.current.get().low_power_standby_enabled
    }

    fn sustained_performance_supported(&self) -> bool {
        self.current.get().sustained_performance_supported
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LockCall {
    Acquire,
    Release,
}

#[derive(Clone, Default)]
pub struct CountingWakeLock {
    pub acquired: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub order: Arc<std::sync::Mutex<Vec<LockCall>>>,
}

impl CountingWakeLock {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<LockCall> {
        self.order.lock().expect("lock order").clone()
    }
}

impl WakeLock for CountingWakeLock {
    fn acquire(&mut self) -> Result<()> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.order.lock().expect("lock order").push(LockCall::Acquire);
        Ok(())
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.order.lock().expect("lock order").push(LockCall::Release);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<FatalNotice>>,
}

impl FatalNotifier for RecordingNotifier {
    fn post(&self, notice: &FatalNotice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[derive(Default)]
pub struct RecordingProcess {
    pub calls: RefCell<Vec<&'static str>>,
}

impl ProcessControl for RecordingProcess {
    fn finish_view(&self) {
        self.calls.borrow_mut().push("finish_view");
    }

    fn terminate(&self) {
        self.calls.borrow_mut().push("terminate");
    }
}

pub struct HostFixture {
    pub host: RenderHost<MockEngine>,
    pub log: EngineLog,
    pub power: ScriptedPower,
    pub lock: CountingWakeLock,
}

pub fn running_host(engine: MockEngine, log: EngineLog) -> HostFixture {
    let mut fixture = new_host(engine, log, "-b clear");
    fixture.host.on_surface_created(7);
    fixture.host.on_surface_changed(640, 480);
    fixture
}

pub fn new_host(engine: MockEngine, log: EngineLog, args: &str) -> HostFixture {
    let power = ScriptedPower::default();
    let lock = CountingWakeLock::default();
    let host = RenderHost::new(
        engine,
        Box::new(power.clone()),
        Box::new(lock.clone()),
        AssetSource::new("assets"),
        LaunchArgs::new(args),
        "data/gpu_result.log",
    );

    HostFixture {
        host,
        log,
        power,
        lock,
    }
}
