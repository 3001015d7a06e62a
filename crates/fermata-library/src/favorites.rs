//! User-curated favorites: customized variants of presets.

use crate::config::DirtyFlag;
use crate::preset::PresetLocation;
use fermata_events::{EventHub, Subscription};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteKey(u64);

impl FavoriteKey {
    /// Generate a new unique key.
    pub fn generate() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Keep the generator ahead of keys brought in from storage.
    fn record_restored(self) {
        NEXT_KEY.fetch_max(self.0 + 1, Ordering::Relaxed);
    }
}

/// A favorite: a preset location plus the user's customizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub key: FavoriteKey,
    pub name: String,
    pub location: PresetLocation,
    /// Gain adjustment in dB applied when this favorite is activated.
    pub gain: f32,
    /// Stereo pan in [-1, 1].
    pub pan: f32,
}

impl Favorite {
    pub fn new(name: impl Into<String>, location: PresetLocation) -> Self {
        Self {
            key: FavoriteKey::generate(),
            name: name.into(),
            location,
            gain: 0.0,
            pan: 0.0,
        }
    }
}

/// Events broadcast by [`FavoritesManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesEvent {
    Added { index: usize, favorite: Favorite },
    Changed { index: usize, favorite: Favorite },
    Removed { index: usize, favorite: Favorite },
    RemovedAll { path: PathBuf },
    Restored,
}

/// Manages the ordered collection of favorites.
///
/// Every mutation marks the dirty flag and then broadcasts the matching event,
/// in that order; both happen exactly once per logical mutation.
pub struct FavoritesManager {
    hub: EventHub<FavoritesEvent>,
    favorites: Vec<Favorite>,
    dirty: DirtyFlag,
}

impl FavoritesManager {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self {
            hub: EventHub::new(),
            favorites: Vec::new(),
            dirty,
        }
    }

    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> Subscription
    where
        O: Send + Sync + 'static,
        F: Fn(&FavoritesEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(owner, callback)
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn contains(&self, key: FavoriteKey) -> bool {
        self.index_of(key).is_some()
    }

    pub fn index_of(&self, key: FavoriteKey) -> Option<usize> {
        self.favorites.iter().position(|favorite| favorite.key == key)
    }

    pub fn get(&self, index: usize) -> Option<&Favorite> {
        self.favorites.get(index)
    }

    pub fn get_by_key(&self, key: FavoriteKey) -> Option<&Favorite> {
        self.index_of(key).and_then(|index| self.favorites.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Favorite> {
        self.favorites.iter()
    }

    /// Add a favorite to the end of the collection, returning its key.
    pub fn add(&mut self, favorite: Favorite) -> FavoriteKey {
        let key = favorite.key;
        self.favorites.push(favorite.clone());
        self.dirty.mark();
        self.hub.notify(FavoritesEvent::Added {
            index: self.favorites.len() - 1,
            favorite,
        });
        key
    }

    /// Edit a favorite in place. No-op if the key is unknown.
    pub fn update(&mut self, key: FavoriteKey, edit: impl FnOnce(&mut Favorite)) {
        let Some(index) = self.index_of(key) else {
            tracing::warn!(?key, "update for unknown favorite");
            return;
        };
        edit(&mut self.favorites[index]);
        // The key is identity; editing must not change it.
        self.favorites[index].key = key;
        self.dirty.mark();
        self.hub.notify(FavoritesEvent::Changed {
            index,
            favorite: self.favorites[index].clone(),
        });
    }

    /// Remove a favorite by key; returns it if present.
    pub fn remove(&mut self, key: FavoriteKey) -> Option<Favorite> {
        let index = self.index_of(key)?;
        let favorite = self.favorites.remove(index);
        self.dirty.mark();
        self.hub.notify(FavoritesEvent::Removed {
            index,
            favorite: favorite.clone(),
        });
        Some(favorite)
    }

    /// Remove every favorite whose preset lives in `path` (the instrument
    /// file is being deleted). Returns how many were removed.
    pub fn remove_associated(&mut self, path: &Path) -> usize {
        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite.location.path != path);
        let removed = before - self.favorites.len();
        if removed > 0 {
            self.dirty.mark();
            self.hub.notify(FavoritesEvent::RemovedAll {
                path: path.to_path_buf(),
            });
        }
        removed
    }

    /// Replace the collection with one loaded from storage.
    ///
    /// Does not mark the dirty flag: restoring is not a user mutation.
    pub fn restore(&mut self, favorites: Vec<Favorite>) {
        for favorite in &favorites {
            favorite.key.record_restored();
        }
        self.favorites = favorites;
        self.hub.notify(FavoritesEvent::Restored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn manager_with_log() -> (
        FavoritesManager,
        DirtyFlag,
        Arc<()>,
        Arc<Mutex<Vec<FavoritesEvent>>>,
    ) {
        let dirty = DirtyFlag::new();
        let manager = FavoritesManager::new(dirty.clone());
        let owner = Arc::new(());
        let log = Arc::new(Mutex::new(Vec::new()));
        let token = manager.subscribe(&owner, {
            let log = Arc::clone(&log);
            move |event| log.lock().push(event.clone())
        });
        drop(token);
        (manager, dirty, owner, log)
    }

    fn favorite(name: &str, path: &str) -> Favorite {
        Favorite::new(name, PresetLocation::new(path, 0, 0, 0))
    }

    #[test]
    fn add_marks_dirty_and_notifies() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        let key = manager.add(favorite("Warm Piano", "/sounds/piano.sf2"));

        assert!(dirty.take());
        assert_eq!(manager.len(), 1);
        assert!(manager.contains(key));
        match log.lock().as_slice() {
            [FavoritesEvent::Added { index: 0, favorite }] => {
                assert_eq!(favorite.name, "Warm Piano");
            }
            other => panic!("unexpected events: {other:?}"),
        };
    }

    #[test]
    fn update_preserves_key_and_notifies_changed() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        let key = manager.add(favorite("Piano", "/sounds/piano.sf2"));
        dirty.take();

        manager.update(key, |favorite| {
            favorite.name = "Bright Piano".into();
            favorite.gain = 3.0;
        });

        assert!(dirty.take());
        let stored = manager.get_by_key(key).unwrap();
        assert_eq!(stored.name, "Bright Piano");
        assert_eq!(stored.gain, 3.0);
        assert!(matches!(
            log.lock().last(),
            Some(FavoritesEvent::Changed { index: 0, .. })
        ));
    }

    #[test]
    fn update_unknown_key_is_a_no_op() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        manager.update(FavoriteKey::generate(), |favorite| {
            favorite.name = "nope".into();
        });
        assert!(!dirty.is_dirty());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn remove_returns_favorite_and_notifies() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        let key = manager.add(favorite("Piano", "/sounds/piano.sf2"));
        dirty.take();

        let removed = manager.remove(key).unwrap();
        assert_eq!(removed.key, key);
        assert!(dirty.take());
        assert!(manager.is_empty());
        assert!(matches!(
            log.lock().last(),
            Some(FavoritesEvent::Removed { index: 0, .. })
        ));

        assert!(manager.remove(key).is_none());
    }

    #[test]
    fn remove_associated_drops_only_matching_path() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        manager.add(favorite("Piano", "/sounds/piano.sf2"));
        manager.add(favorite("Strings", "/sounds/orchestra.sf2"));
        manager.add(favorite("Organ", "/sounds/piano.sf2"));
        dirty.take();

        let removed = manager.remove_associated(Path::new("/sounds/piano.sf2"));
        assert_eq!(removed, 2);
        assert_eq!(manager.len(), 1);
        assert!(dirty.take());
        assert!(matches!(
            log.lock().last(),
            Some(FavoritesEvent::RemovedAll { .. })
        ));

        // Nothing left for that path: no event, no dirty mark.
        assert_eq!(manager.remove_associated(Path::new("/sounds/piano.sf2")), 0);
        assert!(!dirty.is_dirty());
    }

    #[test]
    fn restore_replaces_collection_without_dirtying() {
        let (mut manager, dirty, _owner, log) = manager_with_log();
        let stored = vec![
            favorite("Piano", "/sounds/piano.sf2"),
            favorite("Strings", "/sounds/orchestra.sf2"),
        ];

        manager.restore(stored.clone());
        assert_eq!(manager.len(), 2);
        assert!(!dirty.is_dirty());
        assert!(matches!(log.lock().last(), Some(FavoritesEvent::Restored)));

        // Freshly generated keys never collide with restored ones.
        let fresh = FavoriteKey::generate();
        assert!(stored.iter().all(|favorite| favorite.key != fresh));
    }
}
