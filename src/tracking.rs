use std::collections::{BTreeMap, HashMap};

use crate::scene::SceneId;
use crate::window::WindowHandle;

/// Live window handles per scene, in open order.
///
/// A handle belongs to at most one scene and appears at most once in that
/// scene's list.
#[derive(Debug, Default)]
pub struct WindowTable {
    windows: BTreeMap<SceneId, Vec<WindowHandle>>,
    owners: HashMap<WindowHandle, SceneId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Added,
    AlreadyTracked,
    /// The handle is tracked under a different scene and was left there.
    OwnedByOther,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remove {
    NotTracked,
    Removed,
    /// The handle was the scene's last live window.
    RemovedLast,
}

impl WindowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scene: &SceneId, window: WindowHandle) -> Insert {
        match self.owners.get(&window) {
            Some(owner) if owner == scene => return Insert::AlreadyTracked,
            Some(_) => return Insert::OwnedByOther,
            None => {}
        }
        self.owners.insert(window, scene.clone());
        self.windows.entry(scene.clone()).or_default().push(window);
        Insert::Added
    }

    pub fn remove(&mut self, scene: &str, window: WindowHandle) -> Remove {
        let Some(list) = self.windows.get_mut(scene) else {
            return Remove::NotTracked;
        };
        let Some(index) = list.iter().position(|w| *w == window) else {
            return Remove::NotTracked;
        };
        list.remove(index);
        self.owners.remove(&window);
        if list.is_empty() {
            self.windows.remove(scene);
            Remove::RemovedLast
        } else {
            Remove::Removed
        }
    }

    pub fn windows(&self, scene: &str) -> &[WindowHandle] {
        self.windows.get(scene).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, scene: &str) -> Option<WindowHandle> {
        self.windows(scene).first().copied()
    }

    /// Windows of `scene` other than `except`, most recently opened first.
    pub fn siblings(
        &self,
        scene: &str,
        except: WindowHandle,
    ) -> impl Iterator<Item = WindowHandle> + '_ {
        self.windows(scene)
            .iter()
            .rev()
            .copied()
            .filter(move |w| *w != except)
    }

    pub fn scene_of(&self, window: WindowHandle) -> Option<&SceneId> {
        self.owners.get(&window)
    }

    pub fn count(&self, scene: &str) -> usize {
        self.windows(scene).len()
    }

    pub fn total(&self) -> usize {
        self.owners.len()
    }
}
