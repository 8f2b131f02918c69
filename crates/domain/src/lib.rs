//! Domain model for the marketplace product sync service.
//!
//! This crate provides the core types flowing through a sync:
//! - ProductRequest and the value objects it is built from
//! - InventoryDraft, the Marketplace B create payload
//! - RemoteCallResult, the normalized outcome of a remote call
//! - SyncReport, the per-submission report returned to the caller

pub mod outcome;
pub mod product;
pub mod report;

pub use outcome::{InventoryHandle, RemoteCallResult};
pub use product::{InventoryDraft, Price, ProductRequest, Sku};
pub use report::{MarketplaceBReport, SyncReport};
