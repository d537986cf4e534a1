use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GlloadError, Result};

/// Launch flag whose following token carries the visual config spec.
pub const VISUAL_CONFIG_FLAG: &str = "--visual-config";

/// Color, depth, stencil and buffer bit depths of a rendering surface.
///
/// Used both for the operator's requested target and for the attributes
/// read back from each platform candidate. Candidates are ranked against
/// the target through a [`ConfigScorer`](super::score::ConfigScorer), never
/// by comparing fields directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
    pub depth: u32,
    pub stencil: u32,
    pub buffer: u32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self::new(5, 6, 5, 0, 16, 0, 1)
    }
}

impl VisualConfig {
    pub const fn new(
        red: u32,
        green: u32,
        blue: u32,
        alpha: u32,
        depth: u32,
        stencil: u32,
        buffer: u32,
    ) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            depth,
            stencil,
            buffer,
        }
    }

    /// Parses a `key=value:key=value` spec on top of the default target.
    ///
    /// Segments that are not exactly one `key=value` pair and unknown keys
    /// are skipped. A recognized key with a non-integer value is an error.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let mut config = Self::default();

        for segment in spec.split(':') {
            let mut parts: Vec<&str> = segment.split('=').collect();
            while parts.last().is_some_and(|part| part.is_empty()) {
                parts.pop();
            }

            let [key, value] = parts.as_slice() else {
                continue;
            };

            let Some(slot) = config.slot_mut(key) else {
                continue;
            };

            *slot = value.parse::<u32>().map_err(|_| {
                GlloadError::InvalidConfigValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    /// Extracts the `--visual-config` spec from a launch argument string and
    /// parses it. No flag (or a trailing flag) yields the default target.
    pub fn from_args(args: &str) -> Result<Self> {
        Self::from_spec(spec_from_args(args).unwrap_or_default())
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut u32> {
        match key {
            "red" | "r" => Some(&mut self.red),
            "green" | "g" => Some(&mut self.green),
            "blue" | "b" => Some(&mut self.blue),
            "alpha" | "a" => Some(&mut self.alpha),
            "depth" | "d" => Some(&mut self.depth),
            "stencil" | "s" => Some(&mut self.stencil),
            "buffer" | "buf" => Some(&mut self.buffer),
            _ => None,
        }
    }
}

impl FromStr for VisualConfig {
    type Err = GlloadError;

    fn from_str(spec: &str) -> Result<Self> {
        Self::from_spec(spec)
    }
}

impl fmt::Display for VisualConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r={}:g={}:b={}:a={}:d={}:s={}:buf={}",
            self.red,
            self.green,
            self.blue,
            self.alpha,
            self.depth,
            self.stencil,
            self.buffer
        )
    }
}

/// Returns the token following the first `--visual-config` flag.
pub fn spec_from_args(args: &str) -> Option<&str> {
    let mut tokens = args.split_whitespace();
    tokens.find(|token| *token == VISUAL_CONFIG_FLAG)?;
    tokens.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_rgb565_depth16() {
        assert_eq!(
            VisualConfig::default(),
            VisualConfig::new(5, 6, 5, 0, 16, 0, 1)
        );
    }

    #[test]
    fn aliases_assign_the_same_fields() {
        let long = VisualConfig::from_spec(
            "red=8:green=8:blue=8:alpha=8:depth=24:stencil=8:buffer=32",
        )
        .expect("parse long keys");
        let short =
            VisualConfig::from_spec("r=8:g=8:b=8:a=8:d=24:s=8:buf=32")
                .expect("parse aliases");

        assert_eq!(long, short);
        assert_eq!(long, VisualConfig::new(8, 8, 8, 8, 24, 8, 32));
    }

    #[test]
    fn last_occurrence_wins() {
        let config =
            VisualConfig::from_spec("red=4:r=6:red=7").expect("parse spec");
        assert_eq!(config.red, 7);
    }

    #[test]
    fn malformed_segments_are_skipped() {
        let config = VisualConfig::from_spec("red=:green=1=2:depth=24::x")
            .expect("parse spec");

        assert_eq!(config.red, 5);
        assert_eq!(config.green, 6);
        assert_eq!(config.depth, 24);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            VisualConfig::from_spec("samples=4:blue=8").expect("parse spec");
        assert_eq!(config, VisualConfig::new(5, 6, 8, 0, 16, 0, 1));
    }

    #[test]
    fn non_integer_value_for_known_key_fails() {
        let err = VisualConfig::from_spec("depth=deep")
            .expect_err("non-integer depth must fail");

        assert!(matches!(
            err,
            GlloadError::InvalidConfigValue { ref key, ref value }
                if key == "depth" && value == "deep"
        ));
    }

    #[test]
    fn negative_value_for_known_key_fails() {
        assert!(VisualConfig::from_spec("alpha=-1").is_err());
    }

    #[test]
    fn non_integer_value_for_unknown_key_is_ignored() {
        let config =
            VisualConfig::from_spec("vsync=on").expect("parse spec");
        assert_eq!(config, VisualConfig::default());
    }

    #[test]
    fn spec_from_args_takes_token_after_flag() {
        assert_eq!(
            spec_from_args("-b clear --visual-config a=8 --fullscreen"),
            Some("a=8")
        );
        assert_eq!(spec_from_args("-b clear --visual-config"), None);
        assert_eq!(spec_from_args("-b clear"), None);
        assert_eq!(spec_from_args(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let config = VisualConfig::new(8, 8, 8, 8, 24, 8, 32);
        let parsed: VisualConfig =
            config.to_string().parse().expect("parse displayed config");
        assert_eq!(parsed, config);
    }
}
