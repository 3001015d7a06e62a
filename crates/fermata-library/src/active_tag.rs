//! Tracks which tag filters the instrument list.

use crate::config::DirtyFlag;
use crate::tags::TagKey;
use fermata_events::{EventHub, Subscription};
use std::sync::Arc;

/// Events broadcast by [`ActiveTagManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTagEvent {
    Changed { old: TagKey, new: TagKey },
}

/// Holds the active tag selection, defaulting to the built-in "All" tag.
pub struct ActiveTagManager {
    hub: EventHub<ActiveTagEvent>,
    active: TagKey,
    dirty: DirtyFlag,
}

impl ActiveTagManager {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self {
            hub: EventHub::new(),
            active: TagKey::ALL,
            dirty,
        }
    }

    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> Subscription
    where
        O: Send + Sync + 'static,
        F: Fn(&ActiveTagEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(owner, callback)
    }

    pub fn active(&self) -> TagKey {
        self.active
    }

    /// Change the active tag. Returns whether it actually changed.
    pub fn set_active(&mut self, key: TagKey) -> bool {
        if self.active == key {
            return false;
        }
        let old = std::mem::replace(&mut self.active, key);
        self.dirty.mark();
        self.hub.notify(ActiveTagEvent::Changed { old, new: key });
        true
    }

    /// Restore the selection from storage without dirtying or notifying.
    pub fn restore(&mut self, key: TagKey) {
        self.active = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn defaults_to_the_builtin_tag() {
        let manager = ActiveTagManager::new(DirtyFlag::new());
        assert_eq!(manager.active(), TagKey::ALL);
    }

    #[test]
    fn set_active_notifies_and_dedupes() {
        let dirty = DirtyFlag::new();
        let mut manager = ActiveTagManager::new(dirty.clone());
        let owner = Arc::new(());
        let log = Arc::new(Mutex::new(Vec::new()));
        let _ = manager.subscribe(&owner, {
            let log = Arc::clone(&log);
            move |event| log.lock().push(*event)
        });

        let key = TagKey::generate();
        assert!(manager.set_active(key));
        assert!(!manager.set_active(key));

        assert!(dirty.take());
        assert_eq!(
            *log.lock(),
            vec![ActiveTagEvent::Changed {
                old: TagKey::ALL,
                new: key,
            }]
        );
    }
}
