// src/notify/mod.rs

//! Outbound notification seam.
//!
//! The chat/messaging transport lives outside this crate; the watcher
//! hands results to a [`NotificationSink`] and moves on.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Listing, SubscriberId};

/// Receives per-subscriber watch results.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// One newly appeared listing, delivered most-recent-first within a
    /// cycle.
    async fn notify(&self, subscriber: &SubscriberId, listing: &Listing);

    /// A poll cycle failed. Implementations decide whether the end user
    /// ever sees this; the default only logs.
    async fn cycle_failed(&self, subscriber: &SubscriberId, error: &AppError) {
        log::warn!("Poll cycle failed for {subscriber}: {error}");
    }
}

/// Sink that prints rendered listings to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn notify(&self, subscriber: &SubscriberId, listing: &Listing) {
        println!("[{subscriber}] {}", listing.render());
    }
}
