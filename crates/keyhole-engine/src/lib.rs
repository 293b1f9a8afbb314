//! Short-code allocation and resolution services.
//!
//! The two halves of the engine share one record-store handle and nothing
//! else: [`AllocatorService`] turns long URLs into short codes,
//! [`ResolverService`] turns codes back into URLs under the expiry policy
//! and tracks usage. Core types are re-exported from `keyhole_core`.

pub mod allocator;
pub mod resolver;

pub use allocator::AllocatorService;
pub use resolver::ResolverService;

pub use keyhole_core::{
    AllocateParams, Allocation, Allocator, EngineError, Resolution, Resolver, UrlStats,
};
