//! Preset library state for fermata.
//!
//! Each manager owns its backing collection and broadcasts domain events
//! through an [`EventHub`](fermata_events::EventHub) after every mutation.
//! Mutations also mark a shared [`DirtyFlag`] so a persistence layer knows
//! when to write the library back out; persistence itself lives outside this
//! crate.

mod preset;
pub use preset::PresetLocation;

mod config;
pub use config::DirtyFlag;

mod favorites;
pub use favorites::{Favorite, FavoriteKey, FavoritesEvent, FavoritesManager};

mod tags;
pub use tags::{Tag, TagKey, TagsEvent, TagsManager};

mod active_preset;
pub use active_preset::{ActivePresetEvent, ActivePresetKind, ActivePresetManager};

mod active_tag;
pub use active_tag::{ActiveTagEvent, ActiveTagManager};
