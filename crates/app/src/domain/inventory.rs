//! Inventory service.

use async_trait::async_trait;
use mockall::automock;
use petshop::{
    inventory::{InventoryRecord, InventoryUuid, StockAdjustment},
    prices::Price,
    products::ProductUuid,
};

use crate::domain::StoreError;

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Tracked records, lowest stock first.
    async fn list_inventory(&self) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Tracked records flagged low or out of stock.
    async fn list_low_stock(&self) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Records for the given products. Products without a record are absent.
    async fn inventory_for(&self, products: &[ProductUuid]) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Writes the record's stock and flags as an absolute value.
    async fn save_stock(&self, record: &InventoryRecord) -> Result<InventoryRecord, StoreError>;

    /// Manual recount through the store's audited procedure.
    async fn adjust_stock(&self, adjustment: &StockAdjustment) -> Result<(), StoreError>;

    async fn create_records(&self, records: &[InventoryRecord]) -> Result<Vec<InventoryRecord>, StoreError>;

    async fn set_unit_cost(&self, record: InventoryUuid, unit_cost: Price) -> Result<(), StoreError>;
}
