use log::{debug, info};

use super::surface::{ConfigAttrib, ConfigFilter, DisplayPlatform, RenderApi};
use crate::config::{ConfigScorer, VisualConfig};
use crate::error::{GlloadError, Result};

/// The config chosen for a session, with what it was chosen from.
#[derive(Clone, Debug)]
pub struct Selection<C> {
    pub config: C,
    /// Attributes read back from `config`.
    pub visual: VisualConfig,
    pub score: i32,
    /// Number of candidates that were scored.
    pub candidates: usize,
}

/// Reads the seven bit-depth attributes of a platform config. Attributes
/// the platform cannot report read as 0.
pub fn read_visual_config<P: DisplayPlatform>(
    platform: &P,
    config: &P::Config,
) -> VisualConfig {
    let [red, green, blue, alpha, depth, stencil, buffer] =
        ConfigAttrib::VISUAL
            .map(|attrib| platform.config_attrib(config, attrib).unwrap_or(0));

    VisualConfig::new(red, green, blue, alpha, depth, stencil, buffer)
}

/// Index of the first maximum score. Later candidates replace the current
/// best only when strictly better, so the earliest of equal scores wins.
pub fn best_index(scores: &[i32]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }

    let mut best_score = i32::MIN;
    let mut best = 0;

    for (index, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best = index;
        }
    }

    Some(best)
}

/// Picks the platform config that best matches `target`.
///
/// Every candidate offered for the at-least filter is scored; none is
/// skipped. Any enumeration failure, or an empty enumeration, is returned
/// as a fatal error (see [`GlloadError::is_fatal`]).
pub fn select_best_config<P, S>(
    platform: &P,
    scorer: &S,
    target: &VisualConfig,
) -> Result<Selection<P::Config>>
where
    P: DisplayPlatform,
    S: ConfigScorer + ?Sized,
{
    let filter = ConfigFilter::for_target(target, RenderApi::Gles2);

    let count = platform.count_configs(&filter)?;
    if count == 0 {
        return Err(GlloadError::NoMatchingConfigs);
    }

    let mut configs = platform.fetch_configs(&filter, count)?;
    if configs.is_empty() {
        return Err(GlloadError::NoMatchingConfigs);
    }

    let visuals: Vec<VisualConfig> = configs
        .iter()
        .map(|config| read_visual_config(platform, config))
        .collect();
    let scores: Vec<i32> = visuals
        .iter()
        .map(|visual| scorer.score(visual, target))
        .collect();

    for (index, (visual, score)) in visuals.iter().zip(&scores).enumerate() {
        debug!("Candidate {}: {} scored {}", index, visual, score);
    }

    let best = best_index(&scores).ok_or(GlloadError::NoMatchingConfigs)?;
    let candidates = configs.len();

    info!(
        "Selected config {} of {}: {} (score {})",
        best, candidates, visuals[best], scores[best]
    );

    Ok(Selection {
        config: configs.swap_remove(best),
        visual: visuals[best],
        score: scores[best],
        candidates,
    })
}
