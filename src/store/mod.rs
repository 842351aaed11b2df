// src/store/mod.rs

//! Subscription state backends.
//!
//! The watcher talks to [`SubscriptionStore`] only, so the in-memory map
//! can be swapped for a persistent backend without touching the scheduler
//! or the diff.

pub mod memory;

use async_trait::async_trait;

use crate::models::{SubscriberId, Subscription};

// Re-export for convenience
pub use memory::MemoryStore;

/// Trait for subscription state backends.
///
/// Implementations must serialize reads and writes for a given subscriber
/// key; cross-subscriber coordination is not required.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Current state for a subscriber, if any.
    async fn get(&self, id: &SubscriberId) -> Option<Subscription>;

    /// Create the entry if absent, otherwise overwrite its target URL
    /// (the baseline is kept).
    ///
    /// Returns `true` when a new entry was created.
    async fn subscribe(&self, id: &SubscriberId, target_url: &str) -> bool;

    /// Record the most recent listing identity after a successful poll.
    /// No-op for unknown subscribers.
    async fn set_last_seen(&self, id: &SubscriberId, url: String);
}
