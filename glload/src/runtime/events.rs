use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

use super::sampling::PowerSnapshot;
use crate::config::VisualConfig;

/// Requests sent to a running session from other threads.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HostCommand {
    Pause(bool),
    Quit,
}

/// Session milestones, emitted by the render host and the desktop driver.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    ConfigSelected {
        visual: VisualConfig,
        score: i32,
        candidates: usize,
    },
    SurfaceReady,
    Resized(u32, u32),
    Resampled(PowerSnapshot),
    Paused(bool),
    AverageFps(f32),
    /// The engine ended the session, or the host was torn down.
    Stopped,
    Fatal(String),
}

pub type HostCommandSender = Sender<HostCommand>;
pub type HostCommandReceiver = Receiver<HostCommand>;
pub type HostEventSender = Sender<HostEvent>;
pub type HostEventReceiver = Receiver<HostEvent>;

pub fn command_channel() -> (HostCommandSender, HostCommandReceiver) {
    mpsc::channel()
}

pub fn event_channel() -> (HostEventSender, HostEventReceiver) {
    mpsc::channel()
}
