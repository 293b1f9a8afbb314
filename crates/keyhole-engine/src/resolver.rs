use async_trait::async_trait;
use jiff::Timestamp;
use keyhole_core::{
    EngineError, RecordStore, Resolution, Resolver, ShortCode, UrlStats,
};
use std::sync::Arc;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, EngineError>;

/// Resolves short codes under the expiry policy and tracks usage.
///
/// Shares the record store with the allocator; there is no other coupling
/// between the two. The click counter moves only on the `Redirect` path;
/// misses, expired hits, and stats reads never mutate anything.
#[derive(Debug, Clone)]
pub struct ResolverService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> ResolverService<S> {
    /// Creates a resolver over a shared store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RecordStore> Resolver for ResolverService<S> {
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution> {
        trace!(code = %code, "resolving short code");

        let Some(record) = self.store.get(code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(Resolution::NotFound);
        };

        if record.is_expired(Timestamp::now()) {
            debug!(code = %code, "record has expired");
            return Ok(Resolution::Expired);
        }

        // Count the visit before handing out the target; only this path
        // mutates state.
        self.store.increment_clicks(code).await?;

        debug!(code = %code, url = %record.long_url, "resolved short code");
        Ok(Resolution::Redirect {
            long_url: record.long_url,
        })
    }

    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlStats>> {
        let Some(record) = self.store.get(code).await? else {
            return Ok(None);
        };

        Ok(Some(UrlStats::from_record(
            code.clone(),
            record,
            Timestamp::now(),
        )))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<UrlStats>> {
        let now = Timestamp::now();
        let records = self.store.list_recent(limit).await?;

        Ok(records
            .into_iter()
            .map(|(code, record)| UrlStats::from_record(code, record, now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use keyhole_core::{ReadStore, UrlRecord};
    use keyhole_storage::MemoryStore;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(url: &str, expires_at: Option<Timestamp>) -> UrlRecord {
        UrlRecord::new(url, expires_at)
    }

    async fn setup_with_record(
        c: &ShortCode,
        rec: UrlRecord,
    ) -> (Arc<MemoryStore>, ResolverService<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.insert(c, rec).await.unwrap();
        let service = ResolverService::new(Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn resolve_live_code_redirects_and_counts() {
        let c = code("abc123");
        let (store, service) = setup_with_record(&c, record("https://example.com", None)).await;

        let resolution = service.resolve(&c).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect {
                long_url: "https://example.com".to_string()
            }
        );

        let stored = store.get(&c).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 1);
    }

    #[tokio::test]
    async fn each_resolution_counts_one_click() {
        let c = code("abc123");
        let (store, service) = setup_with_record(&c, record("https://example.com", None)).await;

        for _ in 0..3 {
            service.resolve(&c).await.unwrap();
        }

        let stored = store.get(&c).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 3);
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let service = ResolverService::new(store);

        let resolution = service.resolve(&code("zzzzzz")).await.unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[tokio::test]
    async fn resolve_expired_code_keeps_clicks_unchanged() {
        let c = code("expired");
        let expired_at = Timestamp::now() - SignedDuration::from_hours(1);
        let (store, service) =
            setup_with_record(&c, record("https://example.com", Some(expired_at))).await;

        let resolution = service.resolve(&c).await.unwrap();
        assert_eq!(resolution, Resolution::Expired);

        let stored = store.get(&c).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 0);
    }

    #[tokio::test]
    async fn resolve_future_expiry_still_redirects() {
        let c = code("valid");
        let future = Timestamp::now() + SignedDuration::from_hours(1);
        let (_, service) =
            setup_with_record(&c, record("https://example.com", Some(future))).await;

        let resolution = service.resolve(&c).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect {
                long_url: "https://example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn stats_reports_without_counting_a_visit() {
        let c = code("abc123");
        let (store, service) = setup_with_record(&c, record("https://example.com", None)).await;

        let stats = service.stats(&c).await.unwrap().unwrap();
        assert_eq!(stats.short_code, c);
        assert_eq!(stats.long_url, "https://example.com");
        assert_eq!(stats.clicks, 0);
        assert!(!stats.expired);

        // Inspecting stats is not a visit.
        let stored = store.get(&c).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 0);
    }

    #[tokio::test]
    async fn stats_flags_expired_records() {
        let c = code("expired");
        let expired_at = Timestamp::now() - SignedDuration::from_hours(1);
        let (_, service) =
            setup_with_record(&c, record("https://example.com", Some(expired_at))).await;

        let stats = service.stats(&c).await.unwrap().unwrap();
        assert!(stats.expired);
        assert_eq!(stats.clicks, 0);
    }

    #[tokio::test]
    async fn stats_unknown_code_is_none() {
        let store = Arc::new(MemoryStore::new());
        let service = ResolverService::new(store);

        let stats = service.stats(&code("zzzzzz")).await.unwrap();
        assert!(stats.is_none());
    }

    #[tokio::test]
    async fn recent_lists_newest_first() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..4 {
            store
                .insert(
                    &code(&format!("code{}", i)),
                    record(&format!("https://example{}.com", i), None),
                )
                .await
                .unwrap();
        }
        let service = ResolverService::new(Arc::clone(&store));

        let recent = service.recent(2).await.unwrap();
        let codes: Vec<&str> = recent.iter().map(|s| s.short_code.as_str()).collect();
        assert_eq!(codes, vec!["code3", "code2"]);
    }
}
