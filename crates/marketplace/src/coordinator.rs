//! Coordinator fanning one product submission out to both marketplaces.

use domain::{InventoryDraft, InventoryHandle, MarketplaceBReport, ProductRequest, SyncReport};

use crate::error::Result;
use crate::marketplace_a::MarketplaceA;
use crate::marketplace_b::MarketplaceB;

/// Drives the two marketplace branches of a product submission.
///
/// The branches are independent and run concurrently. Within the
/// Marketplace B branch, create and publish stay strictly sequential and
/// publish only runs when create produced a usable inventory id. Remote
/// failures land in the report as data; the one error that escapes is
/// Marketplace A's unmodeled transport fault.
pub struct SyncCoordinator<A, B>
where
    A: MarketplaceA,
    B: MarketplaceB,
{
    marketplace_a: A,
    marketplace_b: B,
}

impl<A, B> SyncCoordinator<A, B>
where
    A: MarketplaceA,
    B: MarketplaceB,
{
    /// Creates a coordinator over the two marketplace clients.
    pub fn new(marketplace_a: A, marketplace_b: B) -> Self {
        Self {
            marketplace_a,
            marketplace_b,
        }
    }

    /// Submits one product to both marketplaces and reports every outcome.
    #[tracing::instrument(skip(self, request), fields(sku = %request.sku))]
    pub async fn submit(&self, request: &ProductRequest) -> Result<SyncReport> {
        metrics::counter!("sync_submissions_total").increment(1);
        let sync_start = std::time::Instant::now();

        let draft = InventoryDraft::from(request);
        let (marketplace_a, marketplace_b) = tokio::join!(
            self.marketplace_a.post_product(request),
            self.sync_to_marketplace_b(&draft),
        );

        let marketplace_a = match marketplace_a {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::counter!("sync_failed").increment(1);
                metrics::histogram!("sync_duration_seconds")
                    .record(sync_start.elapsed().as_secs_f64());
                tracing::error!(error = %e, "product sync aborted by transport fault");
                return Err(e);
            }
        };

        let report = SyncReport::new(marketplace_a, marketplace_b);

        metrics::counter!("sync_completed").increment(1);
        metrics::histogram!("sync_duration_seconds").record(sync_start.elapsed().as_secs_f64());
        tracing::info!(
            marketplace_a_ok = report.marketplace_a.is_success(),
            inventory_ok = report.marketplace_b.inventory.is_success(),
            publish_ok = report.marketplace_b.publish.is_success(),
            "product sync finished"
        );

        Ok(report)
    }

    /// Runs the sequential create and publish calls against Marketplace B.
    async fn sync_to_marketplace_b(&self, draft: &InventoryDraft) -> MarketplaceBReport {
        let inventory = self.marketplace_b.create_inventory(draft).await;

        let publish = match InventoryHandle::from_result(&inventory) {
            Some(handle) => {
                self.marketplace_b
                    .publish_inventory(handle.inventory_id())
                    .await
            }
            None => domain::RemoteCallResult::failure("Failed to create inventory on Marketplace B"),
        };

        MarketplaceBReport::new(inventory, publish)
    }
}
