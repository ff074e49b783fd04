//! Stock reconciliation
//!
//! Completing an order fires a decrement inside the store, asynchronously and
//! not always correctly. After completion we wait for stock to reach
//! `snapshot - sold`, then overwrite whatever is left over with the expected
//! absolute value.

use jiff::Timestamp;
use petshop::{inventory::InventoryRecord, products::ProductUuid};
use rustc_hash::FxHashMap;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, warn};

use crate::{
    config::SettleWindow,
    domain::{InventoryService, StoreError},
};

/// Stock for one product as read before the sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub product: ProductUuid,
    pub name: String,
    pub before: i64,
    pub sold: u64,
}

impl SnapshotEntry {
    /// Stock once the sale has been taken off.
    pub fn expected(&self) -> i64 {
        self.before
            .saturating_sub(i64::try_from(self.sold).unwrap_or(i64::MAX))
    }
}

/// Tracked stock of every product in a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl StockSnapshot {
    pub fn push(&mut self, entry: SnapshotEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn products(&self) -> Vec<ProductUuid> {
        self.entries.iter().map(|entry| entry.product).collect()
    }

    fn expected(&self) -> FxHashMap<ProductUuid, i64> {
        self.entries
            .iter()
            .map(|entry| (entry.product, entry.expected()))
            .collect()
    }
}

/// How a drifted product was dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionStatus {
    Repaired,
    Failed(String),
}

/// A product whose stock didn't land where the sale said it should.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCorrection {
    pub product: ProductUuid,
    pub name: String,
    pub expected: i64,
    pub observed: i64,
    pub status: CorrectionStatus,
}

impl StockCorrection {
    pub fn is_repaired(&self) -> bool {
        self.status == CorrectionStatus::Repaired
    }
}

/// Polls stock until every product reads as expected or the window closes,
/// returning the last read.
///
/// # Errors
///
/// Returns the store error of a failed read.
pub async fn await_settled(
    inventory: &dyn InventoryService,
    snapshot: &StockSnapshot,
    window: SettleWindow,
) -> Result<Vec<InventoryRecord>, StoreError> {
    let expected = snapshot.expected();
    let products = snapshot.products();
    let deadline = Instant::now() + window.timeout;
    let mut reads = 0_u32;

    loop {
        let records = inventory.inventory_for(&products).await?;
        reads += 1;

        let settled = records
            .iter()
            .all(|record| expected.get(&record.product).is_none_or(|stock| *stock == record.current_stock));

        let now = Instant::now();

        if settled || now >= deadline {
            debug!(reads, settled, "stock read after completion");

            return Ok(records);
        }

        sleep(window.poll.min(deadline - now)).await;
    }
}

/// Writes the expected stock over every product that drifted. A failed write
/// is reported and the remaining products are still repaired.
pub async fn repair(
    inventory: &dyn InventoryService,
    snapshot: &StockSnapshot,
    observed: Vec<InventoryRecord>,
    now: Timestamp,
) -> Vec<StockCorrection> {
    let mut observed: FxHashMap<ProductUuid, InventoryRecord> = observed
        .into_iter()
        .map(|record| (record.product, record))
        .collect();

    let mut corrections = Vec::new();

    for entry in snapshot.entries() {
        let Some(record) = observed.remove(&entry.product) else {
            continue;
        };

        let expected = entry.expected();

        if record.current_stock == expected {
            continue;
        }

        warn!(
            product = %entry.product,
            name = %entry.name,
            before = entry.before,
            sold = entry.sold,
            expected,
            observed = record.current_stock,
            "stock drifted after sale, correcting"
        );

        let observed_stock = record.current_stock;
        let status = match inventory.save_stock(&record.with_stock(expected, now)).await {
            Ok(_saved) => CorrectionStatus::Repaired,
            Err(source) => {
                error!(product = %entry.product, "failed to correct stock: {source}");

                CorrectionStatus::Failed(source.to_string())
            }
        };

        corrections.push(StockCorrection {
            product: entry.product,
            name: entry.name.clone(),
            expected,
            observed: observed_stock,
            status,
        });
    }

    corrections
}
