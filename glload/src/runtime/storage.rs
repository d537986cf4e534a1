use std::env;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use directories_next::{BaseDirs, UserDirs};
use log::debug;

use crate::config::HostSettings;
use crate::error::{GlloadError, Result};

pub const DATA_DIR_ENV: &str = "GLLOAD_DATA_DIR";
pub const RESULTS_LOG_FILE: &str = "gpu_result.log";
const SETTINGS_FILE: &str = "settings.json";
const LISTS_DIR: &str = "lists";

pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.config_dir().join("Glload"))
}

/// `$GLLOAD_DATA_DIR`, else `<documents>/Glload`, else `<home>/Glload`.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty())
    {
        return PathBuf::from(dir);
    }

    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|dir| dir.join("Glload")))
        .or_else(|| BaseDirs::new().map(|base| base.home_dir().join("Glload")))
        .unwrap_or_else(|| PathBuf::from("glload-data"))
}

pub fn default_assets_dir() -> PathBuf {
    default_data_dir().join("assets")
}

pub fn results_log_path(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join(RESULTS_LOG_FILE)
}

/// Lines of the results log. A log that was never written reads as empty.
pub fn read_results_log(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

pub fn append_result(path: &Path, record: &str) -> Result<()> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", record)?;
    Ok(())
}

fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE)
}

pub fn save_settings(
    config_dir: &Path,
    settings: &HostSettings,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(settings)?;
    let path = settings_path(config_dir);
    fs::create_dir_all(config_dir)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn load_settings(config_dir: &Path) -> Result<HostSettings> {
    let json = fs::read_to_string(settings_path(config_dir))?;
    Ok(serde_json::from_str::<HostSettings>(&json)?)
}

pub fn load_settings_if_exists(
    config_dir: &Path,
) -> Result<Option<HostSettings>> {
    match load_settings(config_dir) {
        Ok(settings) => Ok(Some(settings)),
        Err(GlloadError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Saved benchmark lists: one text file per list, one benchmark per line.
#[derive(Clone, Debug)]
pub struct BenchmarkLists {
    dir: PathBuf,
}

impl BenchmarkLists {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(LISTS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the saved lists, sorted.
    pub fn saved_lists(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn save<S: AsRef<str>>(
        &self,
        name: &str,
        benchmarks: &[S],
    ) -> Result<PathBuf> {
        let path = self.path(name)?;
        fs::create_dir_all(&self.dir)?;

        let mut contents = String::new();
        for benchmark in benchmarks {
            contents.push_str(benchmark.as_ref());
            contents.push('\n');
        }
        fs::write(&path, contents)?;

        debug!("Saved {} benchmarks to {}", benchmarks.len(), path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Vec<String>> {
        let text = fs::read_to_string(self.path(name)?)?;
        Ok(text.lines().map(str::to_string).collect())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        fs::remove_file(self.path(name)?)?;
        Ok(())
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.trim().is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);

        if !valid {
            return Err(GlloadError::InvalidListName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}
