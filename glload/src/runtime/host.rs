use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

use super::events::{HostEvent, HostEventSender};
use super::frame_clock::FrameClock;
use super::sampling::{PowerStatus, SamplingState};
use super::wake_lock::{WakeLock, WakeLockGuard};
use crate::config::LaunchArgs;
use crate::render::engine::{AssetSource, RenderEngine};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostState {
    Created,
    SurfaceReady,
    Running,
    Paused,
    Destroyed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameOutcome {
    Rendered { resampled: bool },
    /// The engine ended the session; the host is now destroyed.
    Stopped,
    /// No frame was delivered in the current state.
    Skipped,
}

/// Drives a [`RenderEngine`] through one session.
///
/// Lifecycle callbacks are pushed in by the platform driver. The host owns
/// the wake lock, the sampling state and the engine; none of them outlive
/// it. State moves `Created -> SurfaceReady -> Running <-> Paused ->
/// Destroyed`, and calls that do not fit the current state are ignored.
pub struct RenderHost<E: RenderEngine> {
    engine: E,
    power: Box<dyn PowerStatus>,
    wake_lock: WakeLockGuard,
    assets: AssetSource,
    args: LaunchArgs,
    results_log: PathBuf,
    state: HostState,
    initialized: bool,
    sampling: SamplingState,
    clock: FrameClock,
    events: Option<HostEventSender>,
}

impl<E: RenderEngine> RenderHost<E> {
    pub fn new(
        engine: E,
        power: Box<dyn PowerStatus>,
        wake_lock: Box<dyn WakeLock + Send>,
        assets: AssetSource,
        args: LaunchArgs,
        results_log: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            power,
            wake_lock: WakeLockGuard::acquire(wake_lock),
            assets,
            args,
            results_log: results_log.into(),
            state: HostState::Created,
            initialized: false,
            sampling: SamplingState::new(),
            clock: FrameClock::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: HostEventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn sampling(&self) -> &SamplingState {
        &self.sampling
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn results_log(&self) -> &Path {
        &self.results_log
    }

    pub fn wake_lock_held(&self) -> bool {
        self.wake_lock.is_held()
    }

    pub fn on_surface_created(&mut self, surface: E::Surface) {
        if self.state != HostState::Created {
            warn!("Ignoring surface creation in state {:?}", self.state);
            return;
        }

        info!("Initializing engine with args '{}'", self.args);
        self.engine.init(
            surface,
            &self.assets,
            self.args.as_str(),
            &self.results_log,
        );
        self.initialized = true;
        self.state = HostState::SurfaceReady;
        self.emit(HostEvent::SurfaceReady);
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        match self.state {
            HostState::SurfaceReady => self.state = HostState::Running,
            HostState::Running | HostState::Paused => {}
            HostState::Created | HostState::Destroyed => {
                debug!("Ignoring resize in state {:?}", self.state);
                return;
            }
        }

        self.engine.resize(width, height);
        self.emit(HostEvent::Resized(width, height));
    }

    pub fn on_draw_frame(&mut self) -> FrameOutcome {
        if self.state != HostState::Running {
            return FrameOutcome::Skipped;
        }

        let resampled = self.sampling.advance(&*self.power);
        if resampled {
            let snapshot = self.sampling.snapshot();
            debug!("Power state resampled: {:?}", snapshot);
            self.emit(HostEvent::Resampled(snapshot));
        }

        self.clock.record(Instant::now());

        if !self.engine.render(self.sampling.snapshot()) {
            info!("Engine finished after {} frames", self.clock.frame_count());
            self.destroy();
            return FrameOutcome::Stopped;
        }

        FrameOutcome::Rendered { resampled }
    }

    pub fn pause(&mut self) {
        if self.state != HostState::Running {
            return;
        }
        self.state = HostState::Paused;
        self.clock.reset_timing();
        self.emit(HostEvent::Paused(true));
    }

    pub fn resume(&mut self) {
        if self.state != HostState::Paused {
            return;
        }
        self.state = HostState::Running;
        self.emit(HostEvent::Paused(false));
    }

    /// Ends the session. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.state == HostState::Destroyed {
            return;
        }

        if self.initialized {
            self.engine.done();
        }
        self.wake_lock.release();
        self.state = HostState::Destroyed;
        self.emit(HostEvent::Stopped);
    }

    fn emit(&self, event: HostEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

impl<E: RenderEngine> Drop for RenderHost<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}
