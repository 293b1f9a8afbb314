use crate::error::EngineError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, EngineError>;

/// Parameters for allocating a short code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateParams {
    /// The URL to shorten. Must parse as an absolute URL.
    pub long_url: String,
    /// Lifetime in whole days; `None` means the mapping never expires.
    pub expires_in_days: Option<u32>,
}

impl AllocateParams {
    /// Parameters for a mapping that never expires.
    pub fn permanent(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            expires_in_days: None,
        }
    }

    /// Parameters for a mapping that expires after `days` days.
    pub fn expiring(long_url: impl Into<String>, days: u32) -> Self {
        Self {
            long_url: long_url.into(),
            expires_in_days: Some(days),
        }
    }
}

/// Outcome of an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// The code now mapping to the requested URL.
    pub short_code: ShortCode,
    /// `true` when a fresh record was created, `false` on a dedup hit.
    pub created: bool,
}

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// The record is live; the caller should redirect to `long_url`.
    Redirect { long_url: String },
    /// No record carries this code.
    NotFound,
    /// The record exists but its lifetime has elapsed.
    Expired,
}

/// A read-only snapshot of one mapping's usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStats {
    pub short_code: ShortCode,
    pub long_url: String,
    pub clicks: u64,
    pub expires_at: Option<Timestamp>,
    pub expired: bool,
}

impl UrlStats {
    /// Projects a stored record into a stats snapshot, computing the
    /// `expired` flag against the supplied clock reading.
    pub fn from_record(short_code: ShortCode, record: UrlRecord, now: Timestamp) -> Self {
        let expired = record.is_expired(now);
        Self {
            short_code,
            long_url: record.long_url,
            clicks: record.clicks,
            expires_at: record.expires_at,
            expired,
        }
    }
}

#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Returns the existing mapping for the URL, or creates a fresh one
    /// under a newly generated, globally unique short code.
    async fn allocate(&self, params: AllocateParams) -> Result<Allocation>;
}

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a code under the expiry policy, counting the visit on the
    /// `Redirect` path only.
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution>;

    /// Reports a mapping's usage without counting a visit.
    /// Returns `None` if the code does not exist.
    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlStats>>;

    /// Lists the most recently created mappings.
    async fn recent(&self, limit: usize) -> Result<Vec<UrlStats>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn stats_expired_flag_follows_clock() {
        let now = Timestamp::now();
        let record = UrlRecord::new(
            "https://example.com",
            Some(now - SignedDuration::from_secs(1)),
        );

        let stats = UrlStats::from_record(ShortCode::new_unchecked("abc123"), record, now);
        assert!(stats.expired);
        assert_eq!(stats.clicks, 0);
    }

    #[test]
    fn stats_without_expiry_is_never_expired() {
        let record = UrlRecord::new("https://example.com", None);

        let stats = UrlStats::from_record(
            ShortCode::new_unchecked("abc123"),
            record,
            Timestamp::now(),
        );
        assert!(!stats.expired);
        assert_eq!(stats.expires_at, None);
    }
}
