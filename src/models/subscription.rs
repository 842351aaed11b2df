//! Subscriber identity and per-subscriber watch state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque subscriber identity.
///
/// The transport layer decides what goes in here (a chat id, a user name,
/// a webhook URL); the watcher only needs equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A subscriber's standing request to be notified of new listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    /// The listing page polled for this subscriber
    pub target_url: String,

    /// Absolute URL of the most recent listing at the last successful
    /// poll; `None` until the first successful cycle records a baseline
    pub last_seen_url: Option<String>,
}

impl Subscription {
    /// Fresh subscription with no baseline yet.
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            last_seen_url: None,
        }
    }
}
