use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{EditError, EditResult};
use crate::feedback::DEFAULT_FLASH_DELAY;

/// File name of the per-project config, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "rangekeeper.toml";

/// Error raised while reading one settings layer.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// One layer of configuration as written in a TOML file. Every field is
/// optional so that layers can be stacked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettingsFile {
    /// Directory that receives generated snippet files.
    pub snippets_dir: Option<PathBuf>,
    /// How long transient highlights stay visible.
    pub flash_delay_ms: Option<u64>,
}

impl SettingsFile {
    /// Read and parse a layer. Relative paths in it are resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layer: SettingsFile =
            toml::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(match path.parent() {
            Some(base) => layer.resolve_relative_to(base),
            None => layer,
        })
    }

    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if let Some(dir) = self.snippets_dir.take() {
            self.snippets_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        self
    }

    /// Stack `other` on top of `self`: its set fields win.
    pub fn merge(self, other: SettingsFile) -> Self {
        Self {
            snippets_dir: other.snippets_dir.or(self.snippets_dir),
            flash_delay_ms: other.flash_delay_ms.or(self.flash_delay_ms),
        }
    }
}

/// Effective settings after all layers are merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub snippets_dir: Option<PathBuf>,
    pub flash_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snippets_dir: None,
            flash_delay: DEFAULT_FLASH_DELAY,
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(layer: SettingsFile) -> Self {
        let defaults = Settings::default();
        Self {
            snippets_dir: layer.snippets_dir.or(defaults.snippets_dir),
            flash_delay: layer
                .flash_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.flash_delay),
        }
    }
}

impl Settings {
    /// The snippets directory, or an error telling the user where to set it.
    pub fn require_snippets_dir(&self) -> EditResult<&Path> {
        self.snippets_dir.as_deref().ok_or_else(|| {
            EditError::missing_configuration(
                "snippets-dir",
                format!("set it in {PROJECT_CONFIG_FILE} or pass --snippets-dir"),
            )
        })
    }
}
