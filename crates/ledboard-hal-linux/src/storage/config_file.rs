use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use ledboard_core::settings::{DeckSettings, SettingsStore};
use log::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "ledboard.toml";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigFileError {
    Io(io::ErrorKind),
    Parse(String),
    Serialize(String),
}

impl fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileError::Io(kind) => write!(f, "config file i/o failed: {kind}"),
            ConfigFileError::Parse(message) => write!(f, "config file is invalid: {message}"),
            ConfigFileError::Serialize(message) => {
                write!(f, "config could not be serialized: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigFileError {}

impl From<io::Error> for ConfigFileError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Settings persisted as a TOML file.
///
/// Missing keys fall back to defaults. Saves go through a sibling temp file
/// and a rename so a crash never leaves a truncated config behind.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl Default for TomlSettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for TomlSettingsStore {
    type Error = ConfigFileError;

    fn load(&mut self) -> Result<Option<DeckSettings>, Self::Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let settings = toml::from_str::<DeckSettings>(&raw)
            .map_err(|err| ConfigFileError::Parse(err.to_string()))?;
        debug!(
            "config: loaded {} apps={}",
            self.path.display(),
            settings.apps.len()
        );
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &DeckSettings) -> Result<(), Self::Error> {
        let raw = toml::to_string_pretty(settings)
            .map_err(|err| ConfigFileError::Serialize(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, raw)?;
        fs::rename(&temp, &self.path)?;
        info!("config: saved {}", self.path.display());
        Ok(())
    }
}
