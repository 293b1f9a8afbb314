//! Core types and traits for the keyhole short-link engine.
//!
//! This crate provides the vocabulary shared by the allocation and
//! resolution services: the validated short code, the URL record, the
//! record-store boundary, and the typed operation results.

pub mod error;
pub mod ops;
pub mod record;
pub mod shortcode;
pub mod store;

pub use error::{CoreError, EngineError, StoreError};
pub use ops::{AllocateParams, Allocation, Allocator, Resolution, Resolver, UrlStats};
pub use record::UrlRecord;
pub use shortcode::ShortCode;
pub use store::{ReadStore, RecordStore};
