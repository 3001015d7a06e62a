//! Composition root wiring managers and engine together.

use fermata_engine::{InstrumentLoader, SamplerEngine};
use fermata_library::{
    ActivePresetKind, ActivePresetManager, ActiveTagManager, DirtyFlag, FavoritesManager,
    TagsManager,
};
use std::sync::Arc;

/// Long-lived container for every shared subsystem instance.
///
/// Constructed once at application start; consumers receive references from
/// here instead of reaching for globals. The managers share one dirty flag
/// because the original library persists them as a single consolidated file.
pub struct Components {
    engine: SamplerEngine,
    dirty: DirtyFlag,
    favorites: FavoritesManager,
    tags: TagsManager,
    active_preset: ActivePresetManager,
    active_tag: ActiveTagManager,
}

impl Components {
    pub fn new(loader: Arc<dyn InstrumentLoader>) -> Self {
        let dirty = DirtyFlag::new();
        Self {
            engine: SamplerEngine::new(loader),
            favorites: FavoritesManager::new(dirty.clone()),
            tags: TagsManager::new(dirty.clone()),
            active_preset: ActivePresetManager::new(dirty.clone()),
            active_tag: ActiveTagManager::new(dirty.clone()),
            dirty,
        }
    }

    pub fn engine(&self) -> &SamplerEngine {
        &self.engine
    }

    pub fn dirty(&self) -> &DirtyFlag {
        &self.dirty
    }

    pub fn favorites(&self) -> &FavoritesManager {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesManager {
        &mut self.favorites
    }

    pub fn tags(&self) -> &TagsManager {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagsManager {
        &mut self.tags
    }

    pub fn active_preset(&self) -> &ActivePresetManager {
        &self.active_preset
    }

    pub fn active_tag(&self) -> &ActiveTagManager {
        &self.active_tag
    }

    pub fn active_tag_mut(&mut self) -> &mut ActiveTagManager {
        &mut self.active_tag
    }

    /// Make `kind` the active preset and queue the matching instrument load.
    ///
    /// Re-activating the current selection does nothing. A favorite that no
    /// longer resolves changes the selection without loading anything.
    pub fn activate(&mut self, kind: ActivePresetKind) {
        if !self.active_preset.set_active(kind) {
            return;
        }
        match self.active_preset.resolve(&self.favorites) {
            Some(location) => {
                self.engine.load_preset(
                    location.path.clone(),
                    location.program,
                    location.bank_msb,
                    location.bank_lsb,
                );
            }
            None => {
                tracing::debug!("active preset does not resolve to a location, nothing to load");
            }
        }
    }

    /// Drain the preset pipeline; call before tearing the engine down.
    pub fn shutdown(&self) {
        self.engine.stop();
    }
}
