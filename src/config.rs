use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Result};
use serde::Deserialize;

/// Bounding box that finished previews are scaled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directory scanned (top level only) for gallery images.
    pub photo_library_path: PathBuf,
    /// Lower bound on the gallery size; ids past the discovered files show
    /// placeholder tiles.
    pub min_slot_count: u32,
    /// Bounding box previews are scaled into, aspect ratio preserved.
    pub max_preview_size: PreviewSize,
    /// Pause inserted before each uncached resolution.
    #[serde(with = "humantime_serde")]
    pub load_delay: Duration,
    /// Preferred font family for placeholder id labels.
    pub placeholder_font: Option<String>,
}

impl Configuration {
    const fn default_min_slot_count() -> u32 {
        15
    }

    const fn default_load_delay() -> Duration {
        Duration::from_millis(50)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.max_preview_size.width > 0,
            "max-preview-size.width must be greater than zero"
        );
        ensure!(
            self.max_preview_size.height > 0,
            "max-preview-size.height must be greater than zero"
        );
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            photo_library_path: PathBuf::from("images"),
            min_slot_count: Self::default_min_slot_count(),
            max_preview_size: PreviewSize::default(),
            load_delay: Self::default_load_delay(),
            placeholder_font: None,
        }
    }
}
