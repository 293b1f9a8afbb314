use thiserror::Error;

/// Shape violations in the core vocabulary types.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Failures at the record-store boundary.
///
/// `Conflict` is an internal signal: the allocator consumes it as a retry
/// trigger and it never reaches a caller of the engine. Every other variant
/// is surfaced as-is; the engine does not retry store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short code already taken: {0}")]
    Conflict(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Failures surfaced by the allocation and resolution operations.
///
/// Lookup misses and expired records are not errors; they are carried in
/// the typed results (`Resolution`, `Option<UrlStats>`).
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for EngineError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}
