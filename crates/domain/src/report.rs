//! The per-submission report returned to the caller.

use serde::Serialize;

use crate::outcome::RemoteCallResult;

/// Outcomes of the two sequential Marketplace B calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceBReport {
    /// Result of the create-inventory call.
    pub inventory: RemoteCallResult,

    /// Result of the publish call, or the gated-off failure when no
    /// inventory record was created.
    pub publish: RemoteCallResult,
}

impl MarketplaceBReport {
    /// Creates a report from the two call outcomes.
    pub fn new(inventory: RemoteCallResult, publish: RemoteCallResult) -> Self {
        Self { inventory, publish }
    }
}

/// Complete result of syncing one product to both marketplaces.
///
/// Every submission produces all three slots; a slot holding a failure is
/// data, not an error. The report is assembled once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// Outcome of the single Marketplace A call.
    pub marketplace_a: RemoteCallResult,

    /// Outcomes of the Marketplace B create and publish calls.
    pub marketplace_b: MarketplaceBReport,
}

impl SyncReport {
    /// Creates a report from the marketplace outcomes.
    pub fn new(marketplace_a: RemoteCallResult, marketplace_b: MarketplaceBReport) -> Self {
        Self {
            marketplace_a,
            marketplace_b,
        }
    }
}
