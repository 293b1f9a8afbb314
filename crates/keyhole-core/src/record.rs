use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored URL mapping, keyed by its short code in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened.
    pub long_url: String,
    /// Number of successful resolutions served for this record.
    pub clicks: u64,
    /// When the record expires; `None` means it never expires.
    pub expires_at: Option<Timestamp>,
}

impl UrlRecord {
    /// Creates a fresh record with a zeroed click counter.
    pub fn new(long_url: impl Into<String>, expires_at: Option<Timestamp>) -> Self {
        Self {
            long_url: long_url.into(),
            clicks: 0,
            expires_at,
        }
    }

    /// A record is expired once the clock has moved strictly past
    /// `expires_at`. At the exact expiry instant it is still live.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}
