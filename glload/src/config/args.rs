use std::fmt;

use super::visual::{self, VisualConfig};
use crate::error::Result;

/// The launch argument string as handed to the process.
///
/// Only the `--visual-config` pair is interpreted by the harness; the whole
/// string is forwarded verbatim to the engine's `init`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LaunchArgs {
    raw: String,
}

impl LaunchArgs {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Joins individual tokens with single spaces.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self { raw }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.raw.split_whitespace()
    }

    pub fn visual_config_spec(&self) -> Option<&str> {
        visual::spec_from_args(&self.raw)
    }

    /// The requested surface config target, defaults applied.
    pub fn visual_config(&self) -> Result<VisualConfig> {
        VisualConfig::from_args(&self.raw)
    }
}

impl fmt::Display for LaunchArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for LaunchArgs {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for LaunchArgs {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_joined_with_spaces() {
        let args = LaunchArgs::from_tokens([
            "-b",
            "clear:duration=2",
            "--visual-config",
            "d=24",
        ]);

        assert_eq!(args.as_str(), "-b clear:duration=2 --visual-config d=24");
        assert_eq!(args.visual_config_spec(), Some("d=24"));
        assert_eq!(
            args.visual_config().expect("parse visual config").depth,
            24
        );
    }

    #[test]
    fn empty_args_yield_default_target() {
        let args = LaunchArgs::default();
        assert_eq!(args.tokens().count(), 0);
        assert_eq!(
            args.visual_config().expect("parse visual config"),
            VisualConfig::default()
        );
    }
}
