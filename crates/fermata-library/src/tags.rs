//! Tags for grouping instrument files.

use crate::config::DirtyFlag;
use fermata_events::{EventHub, Subscription};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Key 0 is reserved for the built-in "All" tag.
static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagKey(u64);

impl TagKey {
    /// The built-in tag every instrument belongs to.
    pub const ALL: TagKey = TagKey(0);

    pub fn generate() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    fn record_restored(self) {
        NEXT_KEY.fetch_max(self.0 + 1, Ordering::Relaxed);
    }

    pub fn is_builtin(self) -> bool {
        self == Self::ALL
    }
}

/// A named grouping of instrument files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: TagKey,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: TagKey::generate(),
            name: name.into(),
        }
    }

    fn all() -> Self {
        Self {
            key: TagKey::ALL,
            name: "All".into(),
        }
    }
}

/// Events broadcast by [`TagsManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsEvent {
    Added { index: usize, tag: Tag },
    Changed { index: usize, tag: Tag },
    Removed { index: usize, tag: Tag },
    Restored,
}

/// Manages the ordered tag collection.
///
/// The built-in "All" tag always exists and can be neither renamed nor
/// removed. Mutations mark the dirty flag and then notify, once per logical
/// mutation.
pub struct TagsManager {
    hub: EventHub<TagsEvent>,
    tags: Vec<Tag>,
    dirty: DirtyFlag,
}

impl TagsManager {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self {
            hub: EventHub::new(),
            tags: vec![Tag::all()],
            dirty,
        }
    }

    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> Subscription
    where
        O: Send + Sync + 'static,
        F: Fn(&TagsEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(owner, callback)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn index_of(&self, key: TagKey) -> Option<usize> {
        self.tags.iter().position(|tag| tag.key == key)
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn get_by_key(&self, key: TagKey) -> Option<&Tag> {
        self.index_of(key).and_then(|index| self.tags.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Create a tag with `name`, returning its key.
    pub fn add(&mut self, name: impl Into<String>) -> TagKey {
        let tag = Tag::new(name);
        let key = tag.key;
        self.tags.push(tag.clone());
        self.dirty.mark();
        self.hub.notify(TagsEvent::Added {
            index: self.tags.len() - 1,
            tag,
        });
        key
    }

    /// Rename a tag. No-op for unknown keys and for the built-in tag.
    pub fn rename(&mut self, key: TagKey, name: impl Into<String>) {
        if key.is_builtin() {
            tracing::warn!("attempt to rename the built-in tag");
            return;
        }
        let Some(index) = self.index_of(key) else {
            tracing::warn!(?key, "rename for unknown tag");
            return;
        };
        self.tags[index].name = name.into();
        self.dirty.mark();
        self.hub.notify(TagsEvent::Changed {
            index,
            tag: self.tags[index].clone(),
        });
    }

    /// Remove a tag by key; the built-in tag is never removed.
    pub fn remove(&mut self, key: TagKey) -> Option<Tag> {
        if key.is_builtin() {
            tracing::warn!("attempt to remove the built-in tag");
            return None;
        }
        let index = self.index_of(key)?;
        let tag = self.tags.remove(index);
        self.dirty.mark();
        self.hub.notify(TagsEvent::Removed {
            index,
            tag: tag.clone(),
        });
        Some(tag)
    }

    /// Replace the collection with one loaded from storage, re-inserting the
    /// built-in tag if the stored set lacks it. Does not mark the dirty flag.
    pub fn restore(&mut self, tags: Vec<Tag>) {
        for tag in &tags {
            tag.key.record_restored();
        }
        self.tags = tags;
        if self.index_of(TagKey::ALL).is_none() {
            self.tags.insert(0, Tag::all());
        }
        self.hub.notify(TagsEvent::Restored);
    }
}
