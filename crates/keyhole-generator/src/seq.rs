use crate::Generator;
use keyhole_core::ShortCode;

/// A deterministic short code generator using a sequential counter.
///
/// Produces codes like "k000000", "k000001", etc. Useful for single-node
/// deployments and for tests that need predictable codes. The prefix must
/// be alphanumeric and at most 4 characters so the full code stays within
/// the 10-character shape.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: std::sync::atomic::AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(
                self.counter.load(std::sync::atomic::Ordering::SeqCst),
            ),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(0),
            prefix: prefix.into(),
        }
    }

    /// Creates a new sequential generator starting from a specific counter
    /// value. Useful for resuming from a known state.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        ShortCode::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}
