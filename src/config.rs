//! Flat `section.key = value` configuration storage.
//!
//! Themes and picker settings are written through [`ConfigStore`] rather than
//! serialized as one document, so several components can share a file and
//! each owns only its section.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path} is not valid toml: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Key value store with one level of sections.
pub trait ConfigStore {
    fn get(&self, section: &str, key: &str) -> Option<String>;
    fn set(&mut self, section: &str, key: &str, value: &str);
    fn clear_section(&mut self, section: &str);
    /// Whether anything backs this store yet. A missing file reports false.
    fn exists(&self) -> bool;
    /// Persist pending writes.
    fn flush(&mut self) -> Result<(), ConfigError>;

    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        let raw = self.get(section, key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set(section, key, if value { "True" } else { "False" });
    }
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// In-memory store. `exists` turns true after the first write.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    sections: Sections,
    touched: bool,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.touched = true;
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn clear_section(&mut self, section: &str) {
        self.sections.remove(section);
    }

    fn exists(&self) -> bool {
        self.touched
    }

    fn flush(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// TOML file with one table per section and string values.
#[derive(Debug)]
pub struct FileConfig {
    path: PathBuf,
    sections: Sections,
    existed: bool,
}

impl FileConfig {
    /// `<config dir>/floem-swatches/color_picker.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("floem-swatches")
            .join("color_picker.toml")
    }

    /// Open the file at the default location.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(Self::default_path())
    }

    /// Read `path` if it exists. A missing file is an empty store, not an
    /// error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let (sections, existed) = match fs::read_to_string(&path) {
            Ok(text) => {
                let sections = toml::from_str(&text).map_err(|source| ConfigError::Decode {
                    path: path.clone(),
                    source,
                })?;
                (sections, true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file yet");
                (Sections::new(), false)
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Ok(Self {
            path,
            sections,
            existed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfig {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn clear_section(&mut self, section: &str) {
        self.sections.remove(section);
    }

    fn exists(&self) -> bool {
        self.existed
    }

    fn flush(&mut self) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(&self.sections)?;
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, text).map_err(io_err)?;
        self.existed = true;
        Ok(())
    }
}

/// Flush and log on failure. In-memory state is already updated either way.
pub(crate) fn flush_logged(store: &mut impl ConfigStore) {
    if let Err(e) = store.flush() {
        warn!(error = %e, "failed to write config");
    }
}

const PICKER_SECTION: &str = "ColorPickerUI";

/// Persisted color picker UI toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerSettings {
    pub wheel_mode: bool,
    pub advanced_section_expanded: bool,
    pub srgb_enabled: bool,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            wheel_mode: false,
            advanced_section_expanded: false,
            srgb_enabled: true,
        }
    }
}

impl PickerSettings {
    pub const WHEEL_MODE: &'static str = "bWheelMode";
    pub const ADVANCED_SECTION_EXPANDED: &'static str = "bAdvancedSectionExpanded";
    pub const SRGB_ENABLED: &'static str = "bSRGBEnabled";

    /// Missing or unreadable keys keep their defaults.
    pub fn load(store: &impl ConfigStore) -> Self {
        let defaults = Self::default();
        Self {
            wheel_mode: store
                .get_bool(PICKER_SECTION, Self::WHEEL_MODE)
                .unwrap_or(defaults.wheel_mode),
            advanced_section_expanded: store
                .get_bool(PICKER_SECTION, Self::ADVANCED_SECTION_EXPANDED)
                .unwrap_or(defaults.advanced_section_expanded),
            srgb_enabled: store
                .get_bool(PICKER_SECTION, Self::SRGB_ENABLED)
                .unwrap_or(defaults.srgb_enabled),
        }
    }

    pub fn save(&self, store: &mut impl ConfigStore) {
        store.set_bool(PICKER_SECTION, Self::WHEEL_MODE, self.wheel_mode);
        store.set_bool(
            PICKER_SECTION,
            Self::ADVANCED_SECTION_EXPANDED,
            self.advanced_section_expanded,
        );
        store.set_bool(PICKER_SECTION, Self::SRGB_ENABLED, self.srgb_enabled);
        flush_logged(store);
    }
}
