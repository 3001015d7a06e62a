//! Library manager behavior across crate boundaries.

use fermata::{
    ActivePresetKind, DirtyFlag, Favorite, FavoritesManager, PresetLocation, TagKey, TagsManager,
};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

#[test]
fn deleting_an_instrument_file_cascades_to_favorites() {
    let dirty = DirtyFlag::new();
    let mut favorites = FavoritesManager::new(dirty.clone());
    favorites.add(Favorite::new(
        "Piano",
        PresetLocation::new("/sounds/piano.sf2", 0, 0, 0),
    ));
    favorites.add(Favorite::new(
        "E-Piano",
        PresetLocation::new("/sounds/piano.sf2", 4, 0, 0),
    ));
    let strings = favorites.add(Favorite::new(
        "Strings",
        PresetLocation::new("/sounds/orchestra.sf2", 48, 0, 0),
    ));
    dirty.take();

    assert_eq!(favorites.remove_associated(Path::new("/sounds/piano.sf2")), 2);
    assert_eq!(favorites.len(), 1);
    assert!(favorites.contains(strings));
    assert!(dirty.take());
}

#[test]
fn restored_state_drives_active_selection() {
    let dirty = DirtyFlag::new();
    let mut favorites = FavoritesManager::new(dirty.clone());
    let mut tags = TagsManager::new(dirty.clone());

    let stored_favorite = Favorite::new(
        "Warm Piano",
        PresetLocation::new("/sounds/piano.sf2", 2, 0, 0),
    );
    let stored_key = stored_favorite.key;
    favorites.restore(vec![stored_favorite]);
    tags.restore(vec![fermata::Tag::new("Keys")]);

    let mut active = fermata::ActivePresetManager::new(dirty.clone());
    active.restore(ActivePresetKind::Favorite(stored_key));

    assert_eq!(
        active.resolve(&favorites),
        Some(PresetLocation::new("/sounds/piano.sf2", 2, 0, 0))
    );
    assert_eq!(tags.get(0).unwrap().key, TagKey::ALL);
    assert!(!dirty.is_dirty());
}

#[test]
fn dead_subscribers_are_pruned_across_managers() {
    let dirty = DirtyFlag::new();
    let mut favorites = FavoritesManager::new(dirty);

    let log = Arc::new(Mutex::new(0usize));
    {
        let controller = Arc::new(());
        let _token = favorites.subscribe(&controller, {
            let log = Arc::clone(&log);
            move |_| *log.lock() += 1
        });
        favorites.add(Favorite::new(
            "Piano",
            PresetLocation::new("/sounds/piano.sf2", 0, 0, 0),
        ));
        // controller dropped here
    }
    favorites.add(Favorite::new(
        "Organ",
        PresetLocation::new("/sounds/organ.sf2", 16, 0, 0),
    ));

    assert_eq!(*log.lock(), 1);
}
