use super::visual::VisualConfig;

/// Ranks how closely a candidate config matches a target.
///
/// Scores only have meaning relative to each other: higher is a better
/// match. Implementations must be pure; selection may call `score` once per
/// candidate in any quantity.
pub trait ConfigScorer {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32;
}

impl<S: ConfigScorer + ?Sized> ConfigScorer for &S {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32 {
        (**self).score(candidate, target)
    }
}

impl<S: ConfigScorer + ?Sized> ConfigScorer for Box<S> {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32 {
        (**self).score(candidate, target)
    }
}

const MAXIMUM_COMPONENT_SCORE: i32 = 32;
const UNACCEPTABLE_COMPONENT_PENALTY: i32 = -1000;

/// Component-wise match score.
///
/// Exact matches earn the maximum per-component score. A component that is
/// present but was excluded (target 0), or absent but was requested, is
/// penalized hard. Otherwise the bit difference is weighted by a per
/// component scale, so deeper-than-requested wins for colors, depth and
/// buffer size while stencil depth beyond the request is neutral.
///
/// Not commutative: `score(a, b) != score(b, a)` in general.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchScorer;

impl MatchScorer {
    fn component(component: u32, target: u32, scale: i32) -> i32 {
        if (component > 0 && target == 0) || (component == 0 && target > 0) {
            return UNACCEPTABLE_COMPONENT_PENALTY;
        }

        if component == target {
            return MAXIMUM_COMPONENT_SCORE;
        }

        let diff = i64::from(component) - i64::from(target);
        (diff * i64::from(scale))
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl ConfigScorer for MatchScorer {
    fn score(&self, candidate: &VisualConfig, target: &VisualConfig) -> i32 {
        [
            Self::component(candidate.red, target.red, 4),
            Self::component(candidate.green, target.green, 4),
            Self::component(candidate.blue, target.blue, 4),
            Self::component(candidate.alpha, target.alpha, 4),
            Self::component(candidate.depth, target.depth, 1),
            Self::component(candidate.stencil, target.stencil, 0),
            Self::component(candidate.buffer, target.buffer, 1),
        ]
        .into_iter()
        .fold(0i32, i32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_maximum_per_component() {
        let target = VisualConfig::new(8, 8, 8, 8, 24, 8, 32);
        assert_eq!(
            MatchScorer.score(&target, &target),
            7 * MAXIMUM_COMPONENT_SCORE
        );
    }

    #[test]
    fn unrequested_alpha_is_penalized() {
        let target = VisualConfig::default();
        let opaque = VisualConfig::new(5, 6, 5, 0, 16, 0, 16);
        let with_alpha = VisualConfig::new(5, 6, 5, 8, 16, 0, 16);

        assert!(
            MatchScorer.score(&opaque, &target)
                > MatchScorer.score(&with_alpha, &target)
        );
    }

    #[test]
    fn deeper_color_beats_shallower_color() {
        let target = VisualConfig::new(6, 6, 6, 0, 16, 0, 1);
        let deeper = VisualConfig::new(8, 8, 8, 0, 16, 0, 24);
        let shallower = VisualConfig::new(5, 6, 5, 0, 16, 0, 16);

        assert!(
            MatchScorer.score(&deeper, &target)
                > MatchScorer.score(&shallower, &target)
        );
    }

    #[test]
    fn extra_stencil_depth_is_neutral() {
        let target = VisualConfig::new(8, 8, 8, 0, 24, 1, 24);
        let s1 = VisualConfig::new(8, 8, 8, 0, 24, 2, 24);
        let s8 = VisualConfig::new(8, 8, 8, 0, 24, 8, 24);

        assert_eq!(
            MatchScorer.score(&s1, &target),
            MatchScorer.score(&s8, &target)
        );
    }

    #[test]
    fn references_and_boxes_delegate() {
        let target = VisualConfig::default();
        let candidate = VisualConfig::new(8, 8, 8, 0, 24, 0, 24);
        let boxed: Box<dyn ConfigScorer> = Box::new(MatchScorer);

        assert_eq!(
            (&MatchScorer).score(&candidate, &target),
            boxed.score(&candidate, &target)
        );
    }
}
