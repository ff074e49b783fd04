//! Inventory maintenance
//!
//! Back-office chores on stock records: recounts, syncing records for new
//! products, cost backfill, repairing negative stock and valuation.

use std::sync::Arc;

use jiff::Timestamp;
use petshop::{
    inventory::{InventoryDefaults, InventoryError, InventoryRecord, StockAdjustment, Valuation, valuation},
    products::{Product, ProductUuid},
};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::{CatalogService, InventoryService, StoreError};

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a repair pass touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairReport {
    /// Records clamped up to zero
    pub negative: Vec<InventoryRecord>,

    /// Records whose flags disagreed with their stock
    pub stale_flags: Vec<InventoryRecord>,
}

impl RepairReport {
    pub fn is_empty(&self) -> bool {
        self.negative.is_empty() && self.stale_flags.is_empty()
    }
}

#[derive(Clone)]
pub struct InventoryMaintenance {
    catalog: Arc<dyn CatalogService>,
    inventory: Arc<dyn InventoryService>,
    defaults: InventoryDefaults,
}

impl std::fmt::Debug for InventoryMaintenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryMaintenance")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl InventoryMaintenance {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        inventory: Arc<dyn InventoryService>,
        defaults: InventoryDefaults,
    ) -> Self {
        Self {
            catalog,
            inventory,
            defaults,
        }
    }

    /// # Errors
    ///
    /// Returns the store error of a failed read.
    pub async fn list(&self) -> Result<Vec<InventoryRecord>, MaintenanceError> {
        Ok(self.inventory.list_inventory().await?)
    }

    /// # Errors
    ///
    /// Returns the store error of a failed read.
    pub async fn low_stock(&self) -> Result<Vec<InventoryRecord>, MaintenanceError> {
        Ok(self.inventory.list_low_stock().await?)
    }

    /// Records a manual recount.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NegativeStock`] / [`InventoryError::MissingReason`]
    ///   before anything is written.
    /// - [`MaintenanceError::Store`] when the store refuses the adjustment.
    #[instrument(skip(self, reason))]
    pub async fn adjust(
        &self,
        product: ProductUuid,
        new_quantity: i64,
        reason: &str,
    ) -> Result<StockAdjustment, MaintenanceError> {
        let adjustment = StockAdjustment::new(product, new_quantity, reason)?;

        self.inventory.adjust_stock(&adjustment).await?;

        info!(%product, new_quantity, "stock adjusted");

        Ok(adjustment)
    }

    /// Creates a record for every product that has none, costed at the
    /// product's base price.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read or insert.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<Vec<InventoryRecord>, MaintenanceError> {
        let products = self.catalog.list_products().await?;
        let uuids = products.iter().map(|p| p.uuid).collect::<Vec<_>>();

        let stocked: FxHashSet<ProductUuid> = self
            .inventory
            .inventory_for(&uuids)
            .await?
            .into_iter()
            .map(|record| record.product)
            .collect();

        let missing = products
            .iter()
            .filter(|product| !stocked.contains(&product.uuid))
            .map(|product| {
                let mut record = InventoryRecord::new(product.uuid, self.defaults, product.base_price);
                record.product_name = Some(product.name.clone());
                record
            })
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let created = self.inventory.create_records(&missing).await?;

        info!(created = created.len(), "inventory records created");

        Ok(created)
    }

    /// Sets the unit cost of every uncosted record to its product's base
    /// price. Returns how many records were updated.
    ///
    /// # Errors
    ///
    /// Returns the store error of the first failed read or write.
    #[instrument(skip(self))]
    pub async fn backfill_unit_costs(&self) -> Result<usize, MaintenanceError> {
        let products: FxHashMap<ProductUuid, Product> = self
            .catalog
            .list_products()
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut updated = 0;

        for record in self.inventory.list_inventory().await? {
            if !record.needs_unit_cost() {
                continue;
            }

            let Some(product) = products.get(&record.product) else {
                continue;
            };

            self.inventory
                .set_unit_cost(record.uuid, product.base_price)
                .await?;

            updated += 1;
        }

        info!(updated, "unit costs backfilled");

        Ok(updated)
    }

    /// Clamps negative stock to zero and rewrites flags that disagree with
    /// their stock.
    ///
    /// # Errors
    ///
    /// Returns the store error of the first failed read or write.
    #[instrument(skip(self))]
    pub async fn repair(&self, now: Timestamp) -> Result<RepairReport, MaintenanceError> {
        let mut report = RepairReport::default();

        for record in self.inventory.list_inventory().await? {
            if let Some(repaired) = record.repair_negative(now) {
                warn!(product = %record.product, stock = record.current_stock, "negative stock reset to zero");

                report.negative.push(self.inventory.save_stock(&repaired).await?);
            } else if record.has_stale_flags() {
                let stock = record.current_stock;
                let refreshed = record.with_stock(stock, now);

                report.stale_flags.push(self.inventory.save_stock(&refreshed).await?);
            }
        }

        Ok(report)
    }

    /// Values tracked stock at unit cost.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read, or an overflow.
    pub async fn valuation(&self) -> Result<Valuation, MaintenanceError> {
        let records = self.inventory.list_inventory().await?;

        Ok(valuation(&records)?)
    }
}
