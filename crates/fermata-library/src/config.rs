//! Persistence marker shared by the managers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared mark-as-changed handle.
///
/// Managers mark the flag as part of every mutating operation, paired with the
/// event broadcast for that mutation. A save loop polls [`take`](Self::take)
/// and writes the library out when it returns `true`.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_flag() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_dirty());
        flag.mark();
        assert!(flag.is_dirty());
        assert!(flag.take());
        assert!(!flag.is_dirty());
        assert!(!flag.take());
    }

    #[test]
    fn clones_share_state() {
        let flag = DirtyFlag::new();
        let clone = flag.clone();
        clone.mark();
        assert!(flag.is_dirty());
    }
}
