//! Shared crate-wide constants.

/// URL scheme used for scene activation unless the app configures its own.
pub const DEFAULT_SCHEME: &str = "scenewm";

/// Diagonal distance, in points, between a new window and the sibling it
/// cascades from.
pub const DEFAULT_CASCADE_OFFSET: f64 = 29.0;

/// Version baked into persisted frame keys (`"<scene>-frame-v1"`). Bump it
/// when the descriptor encoding changes so stale frames are ignored.
pub const FRAME_KEY_VERSION: u32 = 1;

/// Directory under the platform config dir holding persisted settings.
pub const SETTINGS_DIR: &str = "scene-wm";

pub const SETTINGS_FILE: &str = "settings.json";
