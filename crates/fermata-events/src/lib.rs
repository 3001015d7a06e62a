//! Event fan-out for fermata managers.
//!
//! Every stateful manager (favorites, tags, active preset) broadcasts its
//! domain events through an [`EventHub`]. Subscribers register a callback tied
//! to the lifetime of an owning object; when the owner is dropped the entry is
//! pruned automatically on the next delivery pass.
//!
//! ```
//! use fermata_events::EventHub;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! enum Change { Added(u32), Removed(u32) }
//!
//! let hub: EventHub<Change> = EventHub::new();
//! let owner = Arc::new(());
//! let _token = hub.subscribe(&owner, |event| println!("{event:?}"));
//! hub.notify(Change::Added(7));
//! ```

mod hub;

pub use hub::{EventHub, Subscription};
