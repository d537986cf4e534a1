use std::process::{Child, Command, Stdio};

use log::{debug, info, warn};

use crate::error::Result;

/// A platform resource that keeps the display awake while held.
pub trait WakeLock {
    fn acquire(&mut self) -> Result<()>;
    fn release(&mut self);
}

impl<W: WakeLock + ?Sized> WakeLock for Box<W> {
    fn acquire(&mut self) -> Result<()> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Holds a [`WakeLock`] for the lifetime of a session.
///
/// The lock is acquired at most once and released at most once, no matter
/// how often `release` is called. Dropping the guard releases it.
pub struct WakeLockGuard {
    lock: Box<dyn WakeLock + Send>,
    held: bool,
}

impl WakeLockGuard {
    /// Acquires `lock`. A failed acquire is logged and the session runs
    /// without it.
    pub fn acquire(mut lock: Box<dyn WakeLock + Send>) -> Self {
        let held = match lock.acquire() {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to acquire wake lock: {}", err);
                false
            }
        };

        Self { lock, held }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn release(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        self.lock.release();
    }
}

impl Drop for WakeLockGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Inhibits idle and sleep through `systemd-inhibit` for as long as the
/// child process lives.
///
/// The inhibited command is `cat` reading a pipe whose only write end
/// belongs to this process. When the host exits, however it exits, the
/// kernel closes that end and the inhibitor ends with it.
#[derive(Debug)]
pub struct InhibitWakeLock {
    tag: String,
    child: Option<Child>,
}

impl InhibitWakeLock {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            child: None,
        }
    }
}

impl WakeLock for InhibitWakeLock {
    fn acquire(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Ok(());
        }

        let child = Command::new("systemd-inhibit")
            .arg("--what=idle:sleep")
            .arg(format!("--who={}", self.tag))
            .arg("--why=GPU benchmark running")
            .arg("--mode=block")
            .arg("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        info!("Wake lock '{}' acquired (pid {})", self.tag, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        drop(child.stdin.take());
        if let Err(err) = child.kill() {
            warn!("Failed to stop wake lock process: {}", err);
        }
        let _ = child.wait();
        info!("Wake lock '{}' released", self.tag);
    }
}

impl Drop for InhibitWakeLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Wake lock for platforms without an inhibit mechanism.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<()> {
        debug!("Wake lock unsupported on this platform");
        Ok(())
    }

    fn release(&mut self) {}
}

pub fn platform_wake_lock(tag: &str) -> Box<dyn WakeLock + Send> {
    if cfg!(target_os = "linux") {
        Box::new(InhibitWakeLock::new(tag))
    } else {
        Box::new(NoopWakeLock)
    }
}
