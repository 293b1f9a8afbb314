use crate::error::StoreError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, StoreError>;

/// A read-only view of the record store.
///
/// Reads never filter on expiry: whether a record is past its lifetime is
/// policy, and policy is applied by the engine, not by storage.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the record for a short code, expired or not.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code is taken. Expired codes count as taken;
    /// codes are never reused.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Finds the record mapping this exact long URL, if any.
    ///
    /// When duplicates exist (the accepted allocation race), the oldest
    /// record wins, keeping dedup deterministic.
    async fn find_by_long_url(&self, long_url: &str)
        -> Result<Option<(ShortCode, UrlRecord)>>;

    /// Lists up to `limit` records, most recently inserted first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<(ShortCode, UrlRecord)>>;
}

#[async_trait]
pub trait RecordStore: ReadStore {
    /// Inserts a new record under a code.
    ///
    /// Returns `Err(Conflict)` when the code is already present, live or
    /// expired. The store's uniqueness guarantee is the authoritative
    /// backstop against concurrent generation of the same candidate.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Adds one to the click counter of a record.
    ///
    /// Atomic where the backend supports an in-place increment.
    /// Incrementing a missing code is a no-op, not an error.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<()>;

    /// Removes every record unconditionally, returning how many were removed.
    async fn delete_all(&self) -> Result<u64>;
}
