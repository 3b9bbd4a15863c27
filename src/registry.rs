//! Scene registry: owns every [`SceneConfiguration`] for the lifetime of
//! the process and hands out collision-free scene ids.

use std::collections::BTreeMap;

use crate::geometry::{Size, UnitPoint};
use crate::scene::{SceneConfiguration, SceneId, Shortcut};

/// One entry of the "New" menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWindowCommand {
    pub scene_id: SceneId,
    pub label: String,
    pub shortcut: Option<Shortcut>,
}

#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: BTreeMap<SceneId, SceneConfiguration>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scene and returns its final id.
    ///
    /// Without a candidate (or with an empty one) the id is derived from `content_kind` (its last
    /// path segment, so `app::views::Inspector` becomes `Inspector`). A
    /// candidate that is already taken gets `-1`, `-2`, ... appended until
    /// an unused id is found.
    pub fn register(
        &mut self,
        candidate: Option<&str>,
        title: Option<&str>,
        is_single_window: bool,
        content_kind: &str,
    ) -> SceneId {
        let base = match candidate.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => kind_name(content_kind).to_string(),
        };
        tracing::debug!(candidate = %base, content_kind, "registering scene");

        let mut id = base.clone();
        if self.scenes.contains_key(id.as_str()) {
            tracing::warn!(scene_id = %base, "duplicate scene id");
            let mut counter = 0usize;
            while self.scenes.contains_key(id.as_str()) {
                counter += 1;
                id = format!("{base}-{counter}");
            }
            tracing::debug!(scene_id = %id, "resolved duplicate scene id");
        }

        let id = SceneId::new(id);
        let config = SceneConfiguration::new(
            id.clone(),
            title.map(str::to_string),
            self.scenes.len(),
            content_kind.to_string(),
            is_single_window,
        );
        tracing::debug!(
            scene_id = %id,
            order = config.registration_order(),
            is_main = config.is_main(),
            single = is_single_window,
            "registered scene"
        );
        self.scenes.insert(id.clone(), config);
        id
    }

    /// Registers a scene whose content is the Rust type `T`.
    pub fn register_for<T: ?Sized>(
        &mut self,
        candidate: Option<&str>,
        title: Option<&str>,
        is_single_window: bool,
    ) -> SceneId {
        self.register(
            candidate,
            title,
            is_single_window,
            std::any::type_name::<T>(),
        )
    }

    pub fn configuration(&self, id: &str) -> Option<&SceneConfiguration> {
        self.scenes.get(id)
    }

    pub(crate) fn configuration_mut(&mut self, id: &str) -> Option<&mut SceneConfiguration> {
        self.scenes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Updates the default placement of a scene. `None` leaves a value as is.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn update_defaults(&mut self, id: &str, anchor: Option<UnitPoint>, size: Option<Size>) {
        let Some(scene) = self.scenes.get_mut(id) else {
            tracing::error!(scene_id = id, "defaults updated for unknown scene");
            panic!("no window group registered with id {id}");
        };
        if anchor.is_some() {
            tracing::debug!(scene_id = id, ?anchor, "set default anchor");
            scene.set_default_anchor(anchor);
        }
        if size.is_some() {
            tracing::debug!(scene_id = id, ?size, "set default size");
            scene.set_default_size(size);
        }
    }

    /// Scenes in registration order.
    pub fn scenes_ordered(&self) -> Vec<&SceneConfiguration> {
        let mut scenes = self.scenes.values().collect::<Vec<_>>();
        scenes.sort();
        scenes
    }

    pub fn main_scene(&self) -> Option<&SceneConfiguration> {
        self.scenes.values().find(|scene| scene.is_main())
    }

    pub fn new_window_commands(&self) -> Vec<NewWindowCommand> {
        self.scenes_ordered()
            .into_iter()
            .filter(|scene| scene.is_user_invokable())
            .map(|scene| NewWindowCommand {
                scene_id: scene.id().clone(),
                label: scene.command_name(),
                shortcut: scene.keyboard_shortcut(),
            })
            .collect()
    }
}

fn kind_name(content_kind: &str) -> &str {
    // strip generics first so `Wrapper<a::B>` stays `Wrapper`
    let head = content_kind.split('<').next().unwrap_or(content_kind);
    head.rsplit("::").next().unwrap_or(head)
}
