use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CASCADE_OFFSET, DEFAULT_SCHEME, FRAME_KEY_VERSION, SETTINGS_DIR, SETTINGS_FILE,
};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowManagerConfig {
    scheme: String,
    cascade_offset: f64,
    frame_key_version: u32,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            cascade_offset: DEFAULT_CASCADE_OFFSET,
            frame_key_version: FRAME_KEY_VERSION,
        }
    }
}

impl WindowManagerConfig {
    pub fn new(scheme: &str) -> Result<Self, ConfigError> {
        Self::default().with_scheme(scheme)
    }

    pub fn with_scheme(mut self, scheme: &str) -> Result<Self, ConfigError> {
        if !is_valid_scheme(scheme) {
            return Err(ConfigError::Scheme(scheme.to_string()));
        }
        self.scheme = scheme.to_string();
        Ok(self)
    }

    pub fn with_cascade_offset(mut self, offset: f64) -> Result<Self, ConfigError> {
        if !offset.is_finite() || offset < 0.0 {
            return Err(ConfigError::CascadeOffset(offset));
        }
        self.cascade_offset = offset;
        Ok(self)
    }

    pub fn with_frame_key_version(mut self, version: u32) -> Result<Self, ConfigError> {
        if version == 0 {
            return Err(ConfigError::FrameKeyVersion);
        }
        self.frame_key_version = version;
        Ok(self)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn cascade_offset(&self) -> f64 {
        self.cascade_offset
    }

    pub fn frame_key_version(&self) -> u32 {
        self.frame_key_version
    }
}

/// `<config dir>/scene-wm/settings.json`, or relative to the working
/// directory when the platform has no config dir.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c))
}
