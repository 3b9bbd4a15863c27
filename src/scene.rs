use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::descriptor::GeometryDescriptor;
use crate::geometry::{Size, UnitPoint};

/// Identity of a logical window group ("main", "inspector", ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for SceneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Keyboard shortcut attached to a "new window" command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
    /// Cmd on macOS, Ctrl elsewhere.
    pub primary: bool,
    pub shift: bool,
}

impl Shortcut {
    pub const NEW_WINDOW: Shortcut = Shortcut {
        key: 'n',
        primary: true,
        shift: false,
    };

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.primary {
            let primary = if cfg!(target_os = "macos") { "Cmd" } else { "Ctrl" };
            parts.push(primary.to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(self.key.to_ascii_uppercase().to_string());
        parts.join("+")
    }
}

#[derive(Debug, Clone)]
pub struct SceneConfiguration {
    id: SceneId,
    is_main: bool,
    title: Option<String>,
    registration_order: usize,
    content_kind: String,
    is_single_window: bool,
    default_anchor: Option<UnitPoint>,
    default_size: Option<Size>,
    saved_geometry: Option<GeometryDescriptor>,
    // persisted geometry is read at most once per run
    geometry_loaded: bool,
}

impl SceneConfiguration {
    pub(crate) fn new(
        id: SceneId,
        title: Option<String>,
        registration_order: usize,
        content_kind: String,
        is_single_window: bool,
    ) -> Self {
        Self {
            id,
            is_main: registration_order == 0,
            title,
            registration_order,
            content_kind,
            is_single_window,
            default_anchor: None,
            default_size: None,
            saved_geometry: None,
            geometry_loaded: false,
        }
    }

    pub fn id(&self) -> &SceneId {
        &self.id
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn registration_order(&self) -> usize {
        self.registration_order
    }

    pub fn content_kind(&self) -> &str {
        &self.content_kind
    }

    pub fn is_single_window(&self) -> bool {
        self.is_single_window
    }

    pub fn default_anchor(&self) -> Option<UnitPoint> {
        self.default_anchor
    }

    pub fn default_size(&self) -> Option<Size> {
        self.default_size
    }

    pub fn saved_geometry(&self) -> Option<&GeometryDescriptor> {
        self.saved_geometry.as_ref()
    }

    /// Scenes with a title, and the main scene, are offered in the "New" menu.
    pub fn is_user_invokable(&self) -> bool {
        self.title.is_some() || self.is_main
    }

    pub fn keyboard_shortcut(&self) -> Option<Shortcut> {
        self.is_main.then_some(Shortcut::NEW_WINDOW)
    }

    pub fn command_name(&self) -> String {
        match &self.title {
            Some(title) => format!("New {title} Window"),
            None => "New Window".to_string(),
        }
    }

    pub(crate) fn set_default_anchor(&mut self, anchor: Option<UnitPoint>) {
        self.default_anchor = anchor;
    }

    pub(crate) fn set_default_size(&mut self, size: Option<Size>) {
        self.default_size = size;
    }

    pub(crate) fn set_saved_geometry(&mut self, descriptor: GeometryDescriptor) {
        self.saved_geometry = Some(descriptor);
        self.geometry_loaded = true;
    }

    pub(crate) fn clear_saved_geometry(&mut self) {
        self.saved_geometry = None;
        self.geometry_loaded = true;
    }

    pub(crate) fn geometry_loaded(&self) -> bool {
        self.geometry_loaded
    }

    pub(crate) fn mark_geometry_loaded(&mut self) {
        self.geometry_loaded = true;
    }
}

impl PartialEq for SceneConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SceneConfiguration {}

impl PartialOrd for SceneConfiguration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SceneConfiguration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.registration_order
            .cmp(&other.registration_order)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, title: Option<&str>, order: usize) -> SceneConfiguration {
        SceneConfiguration::new(
            SceneId::from(id),
            title.map(str::to_string),
            order,
            "ContentView".to_string(),
            false,
        )
    }

    #[test]
    fn first_scene_is_main_and_gets_shortcut() {
        let main = scene("main", None, 0);
        let other = scene("inspector", Some("Inspector"), 1);
        assert!(main.is_main());
        assert_eq!(main.keyboard_shortcut(), Some(Shortcut::NEW_WINDOW));
        assert!(!other.is_main());
        assert_eq!(other.keyboard_shortcut(), None);
    }

    #[test]
    fn command_names_follow_title() {
        assert_eq!(scene("main", None, 0).command_name(), "New Window");
        assert_eq!(
            scene("inspector", Some("Inspector"), 1).command_name(),
            "New Inspector Window"
        );
    }

    #[test]
    fn anonymous_secondary_scene_is_not_invokable() {
        assert!(scene("main", None, 0).is_user_invokable());
        assert!(!scene("helper", None, 1).is_user_invokable());
        assert!(scene("helper", Some("Helper"), 2).is_user_invokable());
    }

    #[test]
    fn ordering_follows_registration() {
        let mut scenes = vec![scene("b", None, 2), scene("a", None, 0), scene("c", None, 1)];
        scenes.sort();
        let ids = scenes.iter().map(|s| s.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn shortcut_display() {
        let text = Shortcut::NEW_WINDOW.display();
        assert!(text.ends_with("+N"));
    }
}
