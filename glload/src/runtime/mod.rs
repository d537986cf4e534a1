pub mod app;
pub mod escalation;
pub mod events;
pub mod frame_clock;
pub mod host;
pub mod power;
pub mod sampling;
pub mod storage;
pub mod wake_lock;
