//! Tracks which preset is currently active.

use crate::config::DirtyFlag;
use crate::favorites::{FavoriteKey, FavoritesManager};
use crate::preset::PresetLocation;
use fermata_events::{EventHub, Subscription};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What is currently loaded into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivePresetKind {
    /// Nothing active (fresh install, or the active file was deleted).
    #[default]
    None,
    /// A plain preset addressed directly.
    Preset(PresetLocation),
    /// A favorite, resolved to its location at activation time.
    Favorite(FavoriteKey),
}

/// Events broadcast by [`ActivePresetManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivePresetEvent {
    Changed {
        old: ActivePresetKind,
        new: ActivePresetKind,
    },
}

/// Holds the active preset selection and broadcasts changes.
pub struct ActivePresetManager {
    hub: EventHub<ActivePresetEvent>,
    active: ActivePresetKind,
    dirty: DirtyFlag,
}

impl ActivePresetManager {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self {
            hub: EventHub::new(),
            active: ActivePresetKind::None,
            dirty,
        }
    }

    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> Subscription
    where
        O: Send + Sync + 'static,
        F: Fn(&ActivePresetEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(owner, callback)
    }

    pub fn active(&self) -> &ActivePresetKind {
        &self.active
    }

    /// Change the active selection. Returns whether it actually changed;
    /// re-activating the current selection is a no-op with no event.
    pub fn set_active(&mut self, kind: ActivePresetKind) -> bool {
        if self.active == kind {
            return false;
        }
        let old = std::mem::replace(&mut self.active, kind.clone());
        self.dirty.mark();
        self.hub
            .notify(ActivePresetEvent::Changed { old, new: kind });
        true
    }

    /// Resolve the active selection to a loadable location.
    ///
    /// `None` when nothing is active or when the active favorite no longer
    /// exists (it was removed after activation).
    pub fn resolve(&self, favorites: &FavoritesManager) -> Option<PresetLocation> {
        match &self.active {
            ActivePresetKind::None => None,
            ActivePresetKind::Preset(location) => Some(location.clone()),
            ActivePresetKind::Favorite(key) => favorites
                .get_by_key(*key)
                .map(|favorite| favorite.location.clone()),
        }
    }

    /// Restore the selection from storage without dirtying or notifying a
    /// change event pair; observers learn about it through the restored
    /// collection events instead.
    pub fn restore(&mut self, kind: ActivePresetKind) {
        self.active = kind;
    }
}
