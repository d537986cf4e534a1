use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use super::escalation::{
    FatalNotifier, ProcessControl, SelectionOutcome, StdProcess,
    choose_config_or_escalate, platform_notifier,
};
use super::events::{
    HostCommand, HostCommandReceiver, HostEvent, HostEventSender,
    command_channel,
};
use super::host::{FrameOutcome, RenderHost};
use super::power::SystemPower;
use super::wake_lock::platform_wake_lock;
use crate::config::{HostSettings, LaunchArgs};
use crate::error::{GlloadError, Result};
use crate::framework::logging;
use crate::render::engine::{AssetSource, RenderEngine};
use crate::render::gpu::{GpuSurface, WgpuDisplay};
use crate::render::surface::DisplayPlatform;

/// Desktop driver: owns the window and feeds winit lifecycle events into a
/// [`RenderHost`].
struct GlloadApp<E: RenderEngine<Surface = GpuSurface>> {
    settings: HostSettings,
    args: LaunchArgs,
    host: RenderHost<E>,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    command_rx: HostCommandReceiver,
    event_tx: Option<HostEventSender>,
    notifier: Box<dyn FatalNotifier>,
    process: Box<dyn ProcessControl>,
    last_average_fps_emit: Instant,
    error: Option<GlloadError>,
}

impl<E: RenderEngine<Surface = GpuSurface>> GlloadApp<E> {
    fn new(
        engine: E,
        args: LaunchArgs,
        settings: HostSettings,
        command_rx: HostCommandReceiver,
        event_tx: Option<HostEventSender>,
    ) -> Self {
        let mut host = RenderHost::new(
            engine,
            Box::new(SystemPower::new()),
            platform_wake_lock("glload"),
            AssetSource::new(&settings.assets_dir),
            args.clone(),
            settings.results_log_path(),
        );
        if let Some(event_tx) = event_tx.clone() {
            host = host.with_events(event_tx);
        }

        Self {
            settings,
            args,
            host,
            window: None,
            window_id: None,
            command_rx,
            event_tx,
            notifier: platform_notifier(),
            process: Box::new(StdProcess),
            last_average_fps_emit: Instant::now(),
            error: None,
        }
    }

    // Window, config selection, surface, then the first size.
    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let target = self.args.visual_config()?;
        info!("Requested visual config {}", target);

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.as_str())
            .with_inner_size(LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|err| GlloadError::Surface(err.to_string()))?,
        );
        self.window_id = Some(window.id());
        self.window = Some(window.clone());

        let mut display = match WgpuDisplay::new(window.clone()) {
            Ok(display) => display,
            Err(err) if err.is_fatal() => {
                self.escalate(event_loop, &err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let selection = match choose_config_or_escalate(
            &display,
            self.host.engine(),
            &target,
            self.notifier.as_ref(),
            self.process.as_ref(),
        )? {
            SelectionOutcome::Chosen(selection) => selection,
            SelectionOutcome::Terminated(_) => {
                event_loop.exit();
                return Ok(());
            }
        };

        self.emit_event(HostEvent::ConfigSelected {
            visual: selection.visual,
            score: selection.score,
            candidates: selection.candidates,
        });

        let surface = display.create_surface(&selection.config)?;
        self.host.on_surface_created(surface);

        let size = window.inner_size();
        self.host.on_surface_changed(size.width, size.height);
        window.request_redraw();

        Ok(())
    }

    fn escalate(&mut self, event_loop: &ActiveEventLoop, err: &GlloadError) {
        self.emit_event(HostEvent::Fatal(err.to_string()));
        let _ = super::escalation::escalate(
            err,
            self.notifier.as_ref(),
            self.process.as_ref(),
        );
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GlloadError) {
        error!("glload session failed: {}", err);
        self.emit_event(HostEvent::Fatal(err.to_string()));
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn process_commands(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                HostCommand::Pause(true) => self.host.pause(),
                HostCommand::Pause(false) => self.resume(),
                HostCommand::Quit => {
                    self.shutdown(event_loop);
                    return;
                }
            }
        }
    }

    fn resume(&mut self) {
        self.host.resume();
        self.request_redraw();
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        match self.host.on_draw_frame() {
            FrameOutcome::Rendered { .. } => {
                self.emit_average_fps_if_due(Instant::now());
                self.request_redraw();
            }
            FrameOutcome::Stopped => {
                info!("Benchmark finished; closing");
                event_loop.exit();
            }
            FrameOutcome::Skipped => {}
        }
    }

    fn emit_average_fps_if_due(&mut self, now: Instant) {
        if now.duration_since(self.last_average_fps_emit)
            < Duration::from_secs(1)
        {
            return;
        }

        self.last_average_fps_emit = now;
        self.emit_event(HostEvent::AverageFps(
            self.host.frame_clock().average_fps(),
        ));
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn emit_event(&self, event: HostEvent) {
        let Some(event_tx) = self.event_tx.as_ref() else {
            return;
        };
        if event_tx.send(event).is_err() {
            warn!("Host event receiver dropped");
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.host.destroy();
        event_loop.exit();
    }
}

impl<E: RenderEngine<Surface = GpuSurface>> ApplicationHandler
    for GlloadApp<E>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.resume();
            return;
        }

        if let Err(err) = self.start_session(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.host.pause();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => {
                self.host.on_surface_changed(size.width, size.height);
            }
            WindowEvent::Occluded(true) => self.host.pause(),
            WindowEvent::Occluded(false) => self.resume(),
            WindowEvent::RedrawRequested => self.draw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.process_commands(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.host.destroy();
    }
}

/// Runs one benchmark session in a desktop window until the engine
/// finishes or the window is closed.
pub fn run<E>(engine: E, args: LaunchArgs, settings: HostSettings) -> Result<()>
where
    E: RenderEngine<Surface = GpuSurface>,
{
    let (_command_tx, command_rx) = command_channel();
    run_with_channels(engine, args, settings, command_rx, None)
}

/// Like [`run`], with a command channel for remote control and an optional
/// event channel for observing the session.
pub fn run_with_channels<E>(
    engine: E,
    args: LaunchArgs,
    settings: HostSettings,
    command_rx: HostCommandReceiver,
    event_tx: Option<HostEventSender>,
) -> Result<()>
where
    E: RenderEngine<Surface = GpuSurface>,
{
    logging::init_logger();

    let event_loop = EventLoop::new()
        .map_err(|err| GlloadError::EventLoop(err.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GlloadApp::new(engine, args, settings, command_rx, event_tx);

    event_loop
        .run_app(&mut app)
        .map_err(|err| GlloadError::EventLoop(err.to_string()))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
