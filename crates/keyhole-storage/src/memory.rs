use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use keyhole_core::{ReadStore, RecordStore, ShortCode, StoreError, UrlRecord};
use std::sync::atomic::{AtomicU64, Ordering};

type Result<T> = std::result::Result<T, StoreError>;

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    clicks: u64,
    expires_at: Option<Timestamp>,
    /// Insertion sequence; orders the recency listing and breaks dedup
    /// ties in favor of the oldest record.
    seq: u64,
}

impl Entry {
    fn to_record(&self) -> UrlRecord {
        UrlRecord {
            long_url: self.long_url.clone(),
            clicks: self.clicks,
            expires_at: self.expires_at,
        }
    }
}

/// In-memory implementation of the record store using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to different
/// buckets without blocking, and its entry API makes insert a true
/// check-and-reserve, so code uniqueness holds under concurrent inserts.
/// Expired entries are kept forever: their codes are never reused and the
/// engine decides what expiry means.
#[derive(Debug)]
pub struct MemoryStore {
    records: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadStore for MemoryStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .records
            .get(code.as_str())
            .map(|entry| entry.to_record()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.records.contains_key(code.as_str()))
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<(ShortCode, UrlRecord)>> {
        let mut oldest: Option<(u64, ShortCode, UrlRecord)> = None;

        for item in self.records.iter() {
            let entry = item.value();
            if entry.long_url != long_url {
                continue;
            }
            if oldest.as_ref().is_none_or(|(seq, _, _)| entry.seq < *seq) {
                oldest = Some((
                    entry.seq,
                    ShortCode::new_unchecked(item.key().clone()),
                    entry.to_record(),
                ));
            }
        }

        Ok(oldest.map(|(_, code, record)| (code, record)))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<(ShortCode, UrlRecord)>> {
        let mut all: Vec<(u64, ShortCode, UrlRecord)> = self
            .records
            .iter()
            .map(|item| {
                (
                    item.value().seq,
                    ShortCode::new_unchecked(item.key().clone()),
                    item.value().to_record(),
                )
            })
            .collect();

        all.sort_by(|a, b| b.0.cmp(&a.0));
        all.truncate(limit);

        Ok(all.into_iter().map(|(_, code, record)| (code, record)).collect())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        match self.records.entry(code.as_str().to_owned()) {
            MapEntry::Occupied(_) => Err(StoreError::Conflict(code.to_string())),
            MapEntry::Vacant(slot) => {
                slot.insert(Entry {
                    long_url: record.long_url,
                    clicks: record.clicks,
                    expires_at: record.expires_at,
                    seq,
                });
                Ok(())
            }
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<()> {
        // The shard lock held by get_mut makes this increment atomic.
        if let Some(mut entry) = self.records.get_mut(code.as_str()) {
            entry.clicks += 1;
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let removed = self.records.len() as u64;
        self.records.clear();
        Ok(removed)
    }
}
