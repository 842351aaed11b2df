// src/store/memory.rs

//! In-memory subscription store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::{SubscriberId, Subscription};

use super::SubscriptionStore;

/// Process-local subscription map.
///
/// The mutex serializes every access, which covers the per-key exclusion
/// the store contract asks for. State lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<SubscriberId, Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked subscriptions.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn get(&self, id: &SubscriberId) -> Option<Subscription> {
        self.entries.lock().await.get(id).cloned()
    }

    async fn subscribe(&self, id: &SubscriberId, target_url: &str) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(id) {
            Some(existing) => {
                existing.target_url = target_url.to_string();
                false
            }
            None => {
                entries.insert(id.clone(), Subscription::new(target_url));
                true
            }
        }
    }

    async fn set_last_seen(&self, id: &SubscriberId, url: String) {
        if let Some(entry) = self.entries.lock().await.get_mut(id) {
            entry.last_seen_url = Some(url);
        }
    }
}
