pub use crate::config::{
    ConfigScorer, HostSettings, LaunchArgs, MatchScorer, VisualConfig,
};
pub use crate::error::{GlloadError, Result};
pub use crate::framework::logging::init_logger;
pub use crate::framework::logging::{debug, error, info, trace, warn};
pub use crate::render::engine::{
    AssetSource, RenderEngine, SceneInfo, SceneOption,
};
pub use crate::render::gpu::{GpuSurface, SurfaceChoice, WgpuDisplay};
pub use crate::render::select::{Selection, select_best_config};
pub use crate::render::surface::{
    ConfigAttrib, ConfigFilter, DisplayPlatform, RenderApi,
};
pub use crate::runtime::escalation::{
    FatalNotice, FatalNotifier, LogNotifier, ProcessControl, Terminated,
    choose_config_or_escalate, escalate,
};
pub use crate::runtime::events::{
    HostCommand, HostCommandReceiver, HostCommandSender, HostEvent,
    HostEventReceiver, HostEventSender, command_channel, event_channel,
};
pub use crate::runtime::frame_clock::FrameClock;
pub use crate::runtime::host::{FrameOutcome, HostState, RenderHost};
pub use crate::runtime::sampling::{
    PowerSnapshot, PowerStatus, SAMPLE_INTERVAL_FRAMES, SamplingState,
};
pub use crate::runtime::storage::BenchmarkLists;
pub use crate::runtime::wake_lock::{WakeLock, WakeLockGuard};
pub use crate::{run, run_with_channels};
