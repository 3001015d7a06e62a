//! # Fermata - SoundFont preset library
//!
//! Umbrella crate coordinating the preset-management subsystems:
//!
//! - **fermata-events** - subscriber registry and event fan-out
//! - **fermata-engine** - serialized preset-change pipeline and instrument
//!   loading
//! - **fermata-library** - favorites, tags, and active-preset managers
//!
//! ## Quick Start
//!
//! ```no_run
//! use fermata::{ActivePresetKind, Components, PresetLocation, SoundFontLoader};
//! use std::sync::Arc;
//!
//! let loader = Arc::new(SoundFontLoader::new(44100));
//! let mut components = Components::new(loader);
//!
//! let location = PresetLocation::new("/sounds/piano.sf2", 0, 0, 0);
//! components.activate(ActivePresetKind::Preset(location));
//!
//! // ... later, before teardown:
//! components.shutdown();
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `soundfont` | `.sf2` loading backed by RustySynth (default) |

/// Re-export of fermata-events for direct access
pub use fermata_events as events;

pub use fermata_events::{EventHub, Subscription};

/// Re-export of fermata-engine for direct access
pub use fermata_engine as engine;

pub use fermata_engine::{
    ChangeRequest, EngineAlert, InstrumentLoader, LoadError, PresetPipeline, SamplerEngine,
};

#[cfg(feature = "soundfont")]
pub use fermata_engine::SoundFontLoader;

/// Re-export of fermata-library for direct access
pub use fermata_library as library;

pub use fermata_library::{
    ActivePresetEvent, ActivePresetKind, ActivePresetManager, ActiveTagEvent, ActiveTagManager,
    DirtyFlag, Favorite, FavoriteKey, FavoritesEvent, FavoritesManager, PresetLocation, Tag,
    TagKey, TagsEvent, TagsManager,
};

mod components;

pub use components::Components;
