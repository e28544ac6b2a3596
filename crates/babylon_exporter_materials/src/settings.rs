// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export settings.
//!
//! Settings live in a RON file next to the document and cover:
//! - Channel overloading (constants kept next to textures)
//! - Whether output links are severed during export
//! - Output file extension
//! - Log filter used by the driver

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "export.ron";

/// Extension of the exported scene file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputExtension {
    /// `.json`
    #[default]
    Json,
    /// `.babylon.js`
    Babylon,
    /// User supplied, with or without the leading dot
    Custom(String),
}

impl OutputExtension {
    /// Extension with its leading dot
    pub fn suffix(&self) -> String {
        match self {
            Self::Json => ".json".to_string(),
            Self::Babylon => ".babylon.js".to_string(),
            Self::Custom(ext) if ext.starts_with('.') => ext.clone(),
            Self::Custom(ext) => format!(".{ext}"),
        }
    }

    /// Replace the extension of `path` with this one
    pub fn apply(&self, path: &Path) -> PathBuf {
        let stem = path.with_extension("");
        let mut name = stem.into_os_string();
        name.push(self.suffix());
        PathBuf::from(name)
    }
}

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings written by a newer exporter
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// Material export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format version
    pub version: u32,
    /// Keep constants next to textures so they can tint them
    pub overload_channels: bool,
    /// Sever output links while materials are exported
    pub sever_output_connections: bool,
    /// Extension of the written file
    pub extension: OutputExtension,
    /// Default log filter directive
    pub log_filter: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            overload_channels: false,
            sever_output_connections: true,
            extension: OutputExtension::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ExportSettings {
    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        let settings: ExportSettings = ron::from_str(s)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }
        Ok(settings)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Settings file path for a document directory
    pub fn settings_file_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ExportSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert!(!settings.overload_channels);
        assert!(settings.sever_output_connections);
        assert_eq!(settings.extension, OutputExtension::Json);
    }

    #[test]
    fn test_serialization() {
        let settings = ExportSettings {
            overload_channels: true,
            extension: OutputExtension::Custom("scene".to_string()),
            ..ExportSettings::default()
        };
        let ron = settings.to_ron().unwrap();
        let loaded = ExportSettings::from_ron(&ron).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = ExportSettings::from_ron("(overload_channels: true)").unwrap();
        assert!(loaded.overload_channels);
        assert!(loaded.sever_output_connections);
        assert_eq!(loaded.log_filter, "info");
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = ExportSettings::from_ron("(version: 99)");
        assert!(matches!(result, Err(SettingsError::UnsupportedVersion { found: 99, .. })));
    }

    #[test]
    fn test_output_extension() {
        let path = Path::new("out/scene.blend");
        assert_eq!(OutputExtension::Json.apply(path), PathBuf::from("out/scene.json"));
        assert_eq!(OutputExtension::Babylon.apply(path), PathBuf::from("out/scene.babylon.js"));
        assert_eq!(
            OutputExtension::Custom("bjs".to_string()).apply(path),
            PathBuf::from("out/scene.bjs")
        );
        assert_eq!(
            OutputExtension::Custom(".gltf.json".to_string()).apply(Path::new("scene")),
            PathBuf::from("scene.gltf.json")
        );
    }
}
