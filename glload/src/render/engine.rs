use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigScorer;
use crate::error::Result;
use crate::runtime::sampling::PowerSnapshot;

/// Read-only view of the directory an engine loads its assets from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AssetSource {
    root: PathBuf,
}

impl AssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative.as_ref())
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(fs::read(self.path(relative))?)
    }

    pub fn read_to_string(&self, relative: impl AsRef<Path>) -> Result<String> {
        Ok(fs::read_to_string(self.path(relative))?)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOption {
    pub name: String,
    pub description: String,
    pub default_value: String,
    /// Empty when any value is accepted.
    pub acceptable_values: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneInfo {
    pub name: String,
    pub options: Vec<SceneOption>,
}

impl SceneInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
        acceptable_values: &[&str],
    ) -> Self {
        self.options.push(SceneOption {
            name: name.into(),
            description: description.into(),
            default_value: default_value.into(),
            acceptable_values: acceptable_values
                .iter()
                .map(|value| value.to_string())
                .collect(),
        });
        self
    }

    pub fn option(&self, name: &str) -> Option<&SceneOption> {
        self.options.iter().find(|option| option.name == name)
    }
}

/// The benchmark workload driven by a [`RenderHost`].
///
/// The host calls `init` once with the created surface, `resize` on every
/// surface size change, `render` once per delivered frame and `done` once
/// at teardown. All calls come from the render thread. The engine also
/// ranks candidate surface configs through its [`ConfigScorer`] supertrait.
///
/// [`RenderHost`]: crate::runtime::host::RenderHost
pub trait RenderEngine: ConfigScorer {
    type Surface;

    /// `args` is the full launch argument string, unmodified. Results are
    /// appended to `results_log`.
    fn init(
        &mut self,
        surface: Self::Surface,
        assets: &AssetSource,
        args: &str,
        results_log: &Path,
    );

    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Renders one frame. Returning `false` ends the session.
    fn render(&mut self, power: PowerSnapshot) -> bool;

    fn done(&mut self) {}

    /// Scenes this engine can run, with their options.
    fn scene_info(
        &self,
        _assets: &AssetSource,
        _results_log: &Path,
    ) -> Vec<SceneInfo> {
        Vec::new()
    }
}
