//! Persisted key/value settings and the frame persistence bridge.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::GeometryDescriptor;
use crate::error::StoreError;

/// Opaque string key/value store that survives restarts.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns whether the key was present.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
    fn keys(&self) -> Vec<String>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.values.remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `path`, treating a missing or blank file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            tracing::debug!(?path, "no settings file yet");
            BTreeMap::new()
        };
        tracing::debug!(?path, entries = values.len(), "opened settings");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.values.remove(key).is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Stores one geometry descriptor per scene under `"<scene>-frame-v<version>"`.
#[derive(Debug)]
pub struct FrameStore<S> {
    store: S,
    suffix: String,
}

impl<S: SettingsStore> FrameStore<S> {
    pub fn new(store: S, version: u32) -> Self {
        Self {
            store,
            suffix: format!("-frame-v{version}"),
        }
    }

    pub fn key_for(&self, scene: &str) -> String {
        format!("{scene}{}", self.suffix)
    }

    pub fn load(&self, scene: &str) -> Option<GeometryDescriptor> {
        let key = self.key_for(scene);
        let value = self.store.get(&key);
        tracing::debug!(key = %key, found = value.is_some(), "read saved frame");
        value.map(GeometryDescriptor::from)
    }

    pub fn save(&mut self, scene: &str, descriptor: &GeometryDescriptor) -> Result<(), StoreError> {
        let key = self.key_for(scene);
        tracing::debug!(key = %key, %descriptor, "writing saved frame");
        self.store.set(&key, descriptor.as_str())
    }

    pub fn remove(&mut self, scene: &str) -> Result<bool, StoreError> {
        let key = self.key_for(scene);
        self.store.remove(&key)
    }

    /// Scene ids that currently have a saved frame.
    pub fn saved_scenes(&self) -> Vec<String> {
        self.store
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_suffix(self.suffix.as_str()).map(str::to_string))
            .filter(|scene| !scene.is_empty())
            .collect()
    }

    /// Forgets every saved frame, leaving unrelated settings alone.
    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let scenes = self.saved_scenes();
        for scene in &scenes {
            self.remove(scene)?;
        }
        tracing::debug!(removed = scenes.len(), "cleared saved frames");
        Ok(scenes.len())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::tempdir;

    #[test]
    fn frame_round_trips_through_bridge() {
        let mut frames = FrameStore::new(MemoryStore::new(), 1);
        assert_eq!(frames.key_for("main"), "main-frame-v1");
        assert!(frames.load("main").is_none());
        let desc = GeometryDescriptor::new("0 600 400 200 0 0 1000 800");
        frames.save("main", &desc).unwrap();
        assert_eq!(frames.load("main"), Some(desc));
    }

    #[test]
    fn clear_all_keeps_unrelated_keys() {
        let mut frames = FrameStore::new(MemoryStore::new(), 1);
        frames.store_mut().set("theme", "dark").unwrap();
        frames.save("main", &GeometryDescriptor::new("a")).unwrap();
        frames.save("x-1", &GeometryDescriptor::new("b")).unwrap();
        let mut saved = frames.saved_scenes();
        saved.sort();
        assert_eq!(saved, ["main", "x-1"]);
        assert_eq!(frames.clear_all().unwrap(), 2);
        assert!(frames.saved_scenes().is_empty());
        assert_eq!(frames.store().get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn versions_do_not_share_keys() {
        let mut store = MemoryStore::new();
        FrameStore::new(&mut store, 1)
            .save("main", &GeometryDescriptor::new("v1"))
            .unwrap();
        assert!(FrameStore::new(&mut store, 2).load("main").is_none());
    }

    #[test]
    fn json_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set("main-frame-v1", "1 2 3 4 0 0 10 10").unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            store.get("main-frame-v1").as_deref(),
            Some("1 2 3 4 0 0 10 10")
        );
    }

    #[test]
    fn json_store_reads_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            indoc! {r#"
                {
                  "inspector-frame-v1": "10 20 300 200 0 0 1000 800",
                  "theme": "dark"
                }
            "#},
        )
        .unwrap();
        let frames = FrameStore::new(JsonFileStore::open(&path).unwrap(), 1);
        assert_eq!(frames.saved_scenes(), ["inspector"]);
        assert_eq!(
            frames.load("inspector").unwrap().as_str(),
            "10 20 300 200 0 0 1000 800"
        );
    }

    #[test]
    fn json_store_empty_and_corrupt_files() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(JsonFileStore::open(&empty).unwrap().keys().is_empty());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&corrupt),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn json_store_remove_rewrites_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.get("a").is_none());
    }
}
