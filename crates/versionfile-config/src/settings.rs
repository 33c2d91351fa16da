use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "VERSIONFILE_CONFIG";

const CONFIG_FILE_NAME: &str = "versionfile.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Package manager used for editable installs.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallerKind {
    #[default]
    Pip,
    Uv,
}

impl std::fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallerKind::Pip => write!(f, "pip"),
            InstallerKind::Uv => write!(f, "uv"),
        }
    }
}

/// Contents of `versionfile.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub python: Option<String>,
    #[serde(default)]
    pub installer: InstallerKind,
    pub uv_path: Option<String>,
    /// Keep two trailing spaces on lines that end with a hard line break.
    #[serde(default)]
    pub markdown_linebreaks: bool,
}

impl Settings {
    /// Resolve the settings file location.
    pub fn path() -> Result<PathBuf, SettingsError> {
        // Honor explicit override for tests / isolated runs.
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.map(|dir| dir.join("versionfile").join(CONFIG_FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Executable used for the `uv` installer backend.
    pub fn uv_program(&self) -> String {
        self.uv_path.clone().unwrap_or_else(|| "uv".to_string())
    }
}
