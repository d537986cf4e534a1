use log::{error, info};

use crate::config::{ConfigScorer, VisualConfig};
use crate::error::{GlloadError, Result};
use crate::render::select::{Selection, select_best_config};
use crate::render::surface::DisplayPlatform;

pub const QUIT_ACTION: &str = "Quit";

/// The blocking notice shown before the process is terminated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FatalNotice {
    pub title: String,
    pub message: String,
    /// Label of the only action; there is no cancel.
    pub action: String,
}

impl FatalNotice {
    pub fn no_usable_config() -> Self {
        Self {
            title: "glload".to_string(),
            message: "glload cannot run because it couldn't find a suitable \
                      surface configuration. Please check that proper GPU \
                      drivers are installed."
                .to_string(),
            action: QUIT_ACTION.to_string(),
        }
    }
}

/// Shows a [`FatalNotice`] and returns once the operator acknowledged it.
pub trait FatalNotifier {
    fn post(&self, notice: &FatalNotice);
}

/// How the process is torn down after a fatal notice.
pub trait ProcessControl {
    /// Closes the hosting view.
    fn finish_view(&self);
    /// Ends the whole process. Only returns in test doubles.
    fn terminate(&self);
}

/// Terminates the real process with a failure exit code.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdProcess;

impl ProcessControl for StdProcess {
    fn finish_view(&self) {
        info!("Closing view after fatal error");
    }

    fn terminate(&self) {
        std::process::exit(1);
    }
}

/// Marker returned once escalation has run. Nothing may follow it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub struct Terminated;

/// Runs the acknowledgement of a fatal notice: finish the view, then
/// terminate the process.
pub fn acknowledge(process: &dyn ProcessControl) -> Terminated {
    process.finish_view();
    process.terminate();
    Terminated
}

/// Reports a fatal error through `notifier` and terminates via `process`.
pub fn escalate(
    err: &GlloadError,
    notifier: &dyn FatalNotifier,
    process: &dyn ProcessControl,
) -> Terminated {
    error!("No suitable surface config found: {}", err);
    notifier.post(&FatalNotice::no_usable_config());
    acknowledge(process)
}

pub enum SelectionOutcome<C> {
    Chosen(Selection<C>),
    Terminated(Terminated),
}

/// Selects a config, escalating on a fatal selection failure.
///
/// Non-fatal errors are returned to the caller untouched.
pub fn choose_config_or_escalate<P, S>(
    platform: &P,
    scorer: &S,
    target: &VisualConfig,
    notifier: &dyn FatalNotifier,
    process: &dyn ProcessControl,
) -> Result<SelectionOutcome<P::Config>>
where
    P: DisplayPlatform,
    S: ConfigScorer + ?Sized,
{
    match select_best_config(platform, scorer, target) {
        Ok(selection) => Ok(SelectionOutcome::Chosen(selection)),
        Err(err) if err.is_fatal() => Ok(SelectionOutcome::Terminated(
            escalate(&err, notifier, process),
        )),
        Err(err) => Err(err),
    }
}

/// Prints the notice to the log and acknowledges immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl FatalNotifier for LogNotifier {
    fn post(&self, notice: &FatalNotice) {
        error!("{}: {} [{}]", notice.title, notice.message, notice.action);
    }
}

/// Modal error dialog whose only button is the notice action.
#[cfg(feature = "dialog")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DialogNotifier;

#[cfg(feature = "dialog")]
impl FatalNotifier for DialogNotifier {
    fn post(&self, notice: &FatalNotice) {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(notice.title.as_str())
            .set_description(notice.message.as_str())
            .set_buttons(rfd::MessageButtons::OkCustom(notice.action.clone()))
            .show();
    }
}

/// The notifier used by the desktop driver.
#[cfg(feature = "dialog")]
pub fn platform_notifier() -> Box<dyn FatalNotifier> {
    Box::new(DialogNotifier)
}

#[cfg(not(feature = "dialog"))]
pub fn platform_notifier() -> Box<dyn FatalNotifier> {
    Box::new(LogNotifier)
}
