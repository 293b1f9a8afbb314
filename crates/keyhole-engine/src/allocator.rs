use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use keyhole_core::{
    AllocateParams, Allocation, Allocator, EngineError, RecordStore, ShortCode, StoreError,
    UrlRecord,
};
use keyhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

type Result<T> = std::result::Result<T, EngineError>;

const SECONDS_PER_DAY: i64 = 86_400;

/// Allocates short codes for long URLs.
///
/// Allocation first dedups on the exact long URL, then draws candidates
/// from the generator until one inserts cleanly. The store's uniqueness
/// constraint arbitrates between concurrent allocators drawing the same
/// candidate; a conflicting insert is consumed as a retry signal and
/// never reaches the caller.
#[derive(Debug, Clone)]
pub struct AllocatorService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S: RecordStore, G: Generator> AllocatorService<S, G> {
    /// Creates an allocator over a shared store handle.
    pub fn new(store: Arc<S>, generator: G) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
        }
    }

    /// Validates that the URL parses as an absolute URL.
    ///
    /// The request boundary already validates input shape; this re-check
    /// is defensive, since an unparseable URL stored here would be served
    /// back on every later resolution.
    fn validate_url(url: &str) -> Result<()> {
        Url::parse(url).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(())
    }

    fn expires_at(expires_in_days: Option<u32>, now: Timestamp) -> Option<Timestamp> {
        expires_in_days
            .map(|days| now + SignedDuration::from_secs(i64::from(days) * SECONDS_PER_DAY))
    }
}

#[async_trait]
impl<S: RecordStore, G: Generator> Allocator for AllocatorService<S, G> {
    async fn allocate(&self, params: AllocateParams) -> Result<Allocation> {
        Self::validate_url(&params.long_url)?;

        // Dedup: the first record for a URL wins on every later request,
        // even when that record has already expired. Nothing is refreshed
        // on a hit.
        if let Some((short_code, _)) = self.store.find_by_long_url(&params.long_url).await? {
            debug!(url = %params.long_url, code = %short_code, "url already shortened");
            return Ok(Allocation {
                short_code,
                created: false,
            });
        }

        let expires_at = Self::expires_at(params.expires_in_days, Timestamp::now());

        loop {
            let candidate: ShortCode = self.generator.generate().into();

            if self.store.exists(&candidate).await? {
                trace!(code = %candidate, "candidate taken, redrawing");
                continue;
            }

            let record = UrlRecord::new(params.long_url.clone(), expires_at);
            match self.store.insert(&candidate, record).await {
                Ok(()) => {
                    debug!(url = %params.long_url, code = %candidate, "created mapping");
                    return Ok(Allocation {
                        short_code: candidate,
                        created: true,
                    });
                }
                // Lost the check-then-insert race to a concurrent
                // allocator; the unique constraint is authoritative, so
                // take a fresh draw.
                Err(StoreError::Conflict(_)) => {
                    trace!(code = %candidate, "insert collided, redrawing");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
