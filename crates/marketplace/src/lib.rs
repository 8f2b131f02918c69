//! Marketplace clients and sync orchestration for product submissions.
//!
//! This crate provides the outbound half of the sync service:
//! - A bounded constant-delay retry executor with pluggable observers
//! - A Marketplace A client (one POST, no retry)
//! - A Marketplace B client (create then publish, each call retried)
//! - The coordinator that fans one submission out to both marketplaces
//!
//! The two marketplaces fail differently on purpose. Marketplace A's
//! unmodeled transport faults escape as errors, while every Marketplace B
//! failure is absorbed into the report once the retry budget is spent.

pub mod coordinator;
pub mod error;
pub mod marketplace_a;
pub mod marketplace_b;
pub mod retry;

pub use coordinator::SyncCoordinator;
pub use error::SyncError;
pub use marketplace_a::{InMemoryMarketplaceA, MarketplaceA, MarketplaceAClient};
pub use marketplace_b::{
    InMemoryMarketplaceB, MarketplaceB, MarketplaceBCallError, MarketplaceBClient,
};
pub use retry::{NoopObserver, RetryError, RetryObserver, RetryPolicy, TracingObserver};
