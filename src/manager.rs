//! The window manager ties scene registration, live-window tracking,
//! initial placement, frame persistence and activation together.
//!
//! All calls happen on the UI thread, interleaved with window events from
//! the same thread. Each call finishes its table updates and persistence
//! before returning, so a later open request for the same scene sees a
//! consistent state.
//!
//! Operating on a scene id that was never registered is a caller bug and
//! panics. Event-ordering oddities (closing an untracked window, a window
//! without a screen, a handle that went stale) are logged and absorbed.

use url::Url;

use crate::activation::{self, ActivationChannel, ActivationResult};
use crate::config::WindowManagerConfig;
use crate::error::{ActivationError, StoreError};
use crate::geometry::{Size, UnitPoint};
use crate::placement::{self, Placement, PlacementRequest};
use crate::registry::{NewWindowCommand, SceneRegistry};
use crate::scene::{SceneConfiguration, SceneId};
use crate::store::{FrameStore, SettingsStore};
use crate::tracking::{Insert, Remove, WindowTable};
use crate::window::{WindowHandle, WindowingLayer};

/// What [`WindowManager::open_window`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// A single-window scene already had a window; it was brought forward.
    ActivatedExisting(WindowHandle),
    /// An activation request for a new window was dispatched.
    Requested(Url),
}

pub struct WindowManager<L, S, A> {
    config: WindowManagerConfig,
    registry: SceneRegistry,
    windows: WindowTable,
    frames: FrameStore<S>,
    layer: L,
    channel: A,
}

impl<L, S, A> WindowManager<L, S, A>
where
    L: WindowingLayer,
    S: SettingsStore,
    A: ActivationChannel,
{
    pub fn new(config: WindowManagerConfig, layer: L, store: S, channel: A) -> Self {
        let frames = FrameStore::new(store, config.frame_key_version());
        Self {
            config,
            registry: SceneRegistry::new(),
            windows: WindowTable::new(),
            frames,
            layer,
            channel,
        }
    }

    pub fn register_scene(
        &mut self,
        candidate: Option<&str>,
        title: Option<&str>,
        is_single_window: bool,
        content_kind: &str,
    ) -> SceneId {
        self.registry
            .register(candidate, title, is_single_window, content_kind)
    }

    pub fn register_scene_for<T: ?Sized>(
        &mut self,
        candidate: Option<&str>,
        title: Option<&str>,
        is_single_window: bool,
    ) -> SceneId {
        self.registry
            .register_for::<T>(candidate, title, is_single_window)
    }

    pub fn configuration(&self, scene: &str) -> Option<&SceneConfiguration> {
        self.registry.configuration(scene)
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// # Panics
    ///
    /// Panics if `scene` was never registered.
    pub fn update_defaults(&mut self, scene: &str, anchor: Option<UnitPoint>, size: Option<Size>) {
        self.registry.update_defaults(scene, anchor, size);
    }

    pub fn set_default_anchor(&mut self, scene: &str, anchor: UnitPoint) {
        self.update_defaults(scene, Some(anchor), None);
    }

    pub fn set_default_size(&mut self, scene: &str, size: Size) {
        self.update_defaults(scene, None, Some(size));
    }

    pub fn new_window_commands(&self) -> Vec<NewWindowCommand> {
        self.registry.new_window_commands()
    }

    pub fn windows(&self, scene: &str) -> &[WindowHandle] {
        self.windows.windows(scene)
    }

    pub fn scene_for_window(&self, window: WindowHandle) -> Option<&SceneId> {
        self.windows.scene_of(window)
    }

    /// Starts tracking `window` for `scene`. Repeated calls are no-ops.
    ///
    /// # Panics
    ///
    /// Panics if `scene` was never registered.
    pub fn register_window(&mut self, scene: &str, window: WindowHandle) {
        let id = self.expect_scene(scene).id().clone();
        if !self.layer.is_alive(window) {
            tracing::warn!(scene_id = scene, %window, "ignoring connect from a closed window");
            return;
        }
        match self.windows.insert(&id, window) {
            Insert::Added => {
                tracing::debug!(scene_id = scene, %window, "registered window");
            }
            Insert::AlreadyTracked => return,
            Insert::OwnedByOther => {
                tracing::warn!(
                    scene_id = scene,
                    %window,
                    owner = ?self.windows.scene_of(window),
                    "window already belongs to another scene"
                );
                return;
            }
        }
        self.ensure_geometry_loaded(scene);
    }

    /// Stops tracking `window`. When it was the scene's last window its
    /// final geometry is kept in memory and persisted.
    ///
    /// # Panics
    ///
    /// Panics if `scene` was never registered.
    pub fn unregister_window(&mut self, scene: &str, window: WindowHandle) {
        self.expect_scene(scene);
        match self.windows.remove(scene, window) {
            Remove::NotTracked => {
                tracing::warn!(scene_id = scene, %window, "closing window was not tracked");
            }
            Remove::Removed => {
                tracing::debug!(scene_id = scene, %window, "removed window");
            }
            Remove::RemovedLast => {
                tracing::debug!(scene_id = scene, %window, "removed last window");
                self.save_last_geometry(scene, window);
            }
        }
    }

    fn save_last_geometry(&mut self, scene: &str, window: WindowHandle) {
        let Some(descriptor) = self.layer.frame_descriptor(window) else {
            tracing::warn!(scene_id = scene, %window, "window vanished before its frame was saved");
            return;
        };
        tracing::debug!(scene_id = scene, %descriptor, "saving frame of last window");
        if let Some(config) = self.registry.configuration_mut(scene) {
            config.set_saved_geometry(descriptor.clone());
        }
        if let Err(err) = self.frames.save(scene, &descriptor) {
            tracing::warn!(scene_id = scene, error = %err, "failed to persist window frame");
        }
    }

    fn ensure_geometry_loaded(&mut self, scene: &str) {
        let loaded = self
            .registry
            .configuration(scene)
            .is_none_or(|config| config.geometry_loaded());
        if loaded {
            return;
        }
        let saved = self.frames.load(scene);
        if let Some(config) = self.registry.configuration_mut(scene) {
            match saved {
                Some(descriptor) => config.set_saved_geometry(descriptor),
                None => config.mark_geometry_loaded(),
            }
        }
    }

    /// Picks and applies the first frame of a window that is about to
    /// become visible. Returns the decision that was applied.
    ///
    /// # Panics
    ///
    /// Panics if `scene` was never registered.
    pub fn set_initial_frame(&mut self, scene: &str, window: WindowHandle) -> Placement {
        self.expect_scene(scene);
        self.ensure_geometry_loaded(scene);
        let Some(current_frame) = self.layer.frame(window) else {
            tracing::warn!(scene_id = scene, %window, "cannot place a closed window");
            return Placement::Unchanged;
        };
        // a sibling may already be gone while its close is still queued
        let sibling_frame = self
            .windows
            .siblings(scene, window)
            .find_map(|sibling| self.layer.frame(sibling));

        let placement = {
            let config = self.expect_scene(scene);
            placement::plan(&PlacementRequest {
                current_frame,
                visible_frame: self.layer.visible_screen_frame(window),
                sibling_frame,
                saved_geometry: config.saved_geometry(),
                default_anchor: config.default_anchor(),
                default_size: config.default_size(),
                cascade_offset: self.config.cascade_offset(),
            })
        };

        let applied = match &placement {
            Placement::Cascade(frame) | Placement::Anchor(frame) => {
                self.layer.set_frame(window, *frame)
            }
            Placement::Restore(descriptor) => {
                self.layer.set_frame_from_descriptor(window, descriptor)
            }
            Placement::Resize(size) => self.layer.set_frame(window, current_frame.with_size(*size)),
            Placement::Unchanged => true,
        };
        if !applied {
            tracing::warn!(scene_id = scene, %window, ?placement, "windowing layer rejected frame");
        }
        tracing::debug!(
            scene_id = scene,
            %window,
            ?placement,
            frame = ?self.layer.frame(window),
            "placed window"
        );
        placement
    }

    /// Opens a window of `scene`, or brings the existing one forward when
    /// the scene allows a single window only.
    ///
    /// # Panics
    ///
    /// Panics if `scene` was never registered.
    pub fn open_window(&mut self, scene: &str) -> Result<OpenOutcome, ActivationError> {
        let single = self.expect_scene(scene).is_single_window();
        tracing::debug!(scene_id = scene, single, "open window");
        if single && let Some(window) = self.activate_existing(scene) {
            return Ok(OpenOutcome::ActivatedExisting(window));
        }
        let url = activation::activation_url(self.config.scheme(), scene)?;
        self.channel.dispatch(&url)?;
        Ok(OpenOutcome::Requested(url))
    }

    /// Intercepts an inbound activation URL. A request for a single-window
    /// scene that already has a window activates it; everything else,
    /// including URLs for other schemes, passes through.
    pub fn handle_external_activation(&mut self, url: &Url) -> ActivationResult {
        match activation::scene_from_url(url, self.config.scheme()) {
            Ok(scene) => self.handle_activation_request(scene.as_str()),
            Err(err) => {
                tracing::debug!(%url, error = %err, "activation not for us");
                ActivationResult::PassThrough
            }
        }
    }

    /// Same as [`Self::handle_external_activation`] for channels that carry
    /// the bare scene id.
    pub fn handle_activation_request(&mut self, scene: &str) -> ActivationResult {
        let single = self
            .registry
            .configuration(scene)
            .is_some_and(|config| config.is_single_window());
        if single && self.activate_existing(scene).is_some() {
            tracing::debug!(scene_id = scene, "reopened single window");
            return ActivationResult::Handled;
        }
        ActivationResult::PassThrough
    }

    fn activate_existing(&mut self, scene: &str) -> Option<WindowHandle> {
        let window = self
            .windows
            .windows(scene)
            .iter()
            .copied()
            .find(|w| self.layer.is_alive(*w))?;
        self.layer.bring_to_front(window).then_some(window)
    }

    /// Removes every persisted frame and forgets the ones loaded this run.
    pub fn clear_saved_frames(&mut self) -> Result<usize, StoreError> {
        let ids = self
            .registry
            .scenes_ordered()
            .into_iter()
            .map(|config| config.id().clone())
            .collect::<Vec<_>>();
        for id in ids {
            if let Some(config) = self.registry.configuration_mut(id.as_str()) {
                config.clear_saved_geometry();
            }
        }
        self.frames.clear_all()
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn frames(&self) -> &FrameStore<S> {
        &self.frames
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    pub fn channel(&self) -> &A {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut A {
        &mut self.channel
    }

    fn expect_scene(&self, scene: &str) -> &SceneConfiguration {
        match self.registry.configuration(scene) {
            Some(config) => config,
            None => {
                tracing::error!(scene_id = scene, "unknown scene");
                panic!("no window group registered with id {scene}");
            }
        }
    }
}
