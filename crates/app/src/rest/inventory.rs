//! Inventory over PostgREST.

use async_trait::async_trait;
use petshop::{
    inventory::{InventoryRecord, InventoryUuid, StockAdjustment},
    prices::{self, Price},
    products::ProductUuid,
};
use tracing::instrument;

use crate::{
    domain::{InventoryService, StoreError},
    rest::{
        RestStore, eq, in_list,
        rows::{AdjustStockParams, InventoryRow, NewInventoryRow, StockPatch, UnitCostPatch},
        single,
    },
};

const INVENTORY: &str = "inventory";

const RECORD_SELECT: &str = "*,menu_items(id,name,base_price,category)";

fn into_records(rows: Vec<InventoryRow>) -> Result<Vec<InventoryRecord>, StoreError> {
    Ok(rows
        .into_iter()
        .map(InventoryRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl InventoryService for RestStore {
    #[instrument(skip(self))]
    async fn list_inventory(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = self
            .select(
                INVENTORY,
                RECORD_SELECT,
                &[
                    ("is_tracked", eq(true)),
                    ("order", "current_stock.asc".to_string()),
                ],
            )
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self))]
    async fn list_low_stock(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = self
            .select(
                INVENTORY,
                RECORD_SELECT,
                &[
                    ("is_tracked", eq(true)),
                    ("or", "(is_low_stock.eq.true,is_out_of_stock.eq.true)".to_string()),
                    ("order", "current_stock.asc".to_string()),
                ],
            )
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self))]
    async fn inventory_for(&self, products: &[ProductUuid]) -> Result<Vec<InventoryRecord>, StoreError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .select(INVENTORY, RECORD_SELECT, &[("menu_item_id", in_list(products))])
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self, record), fields(product = %record.product, stock = record.current_stock))]
    async fn save_stock(&self, record: &InventoryRecord) -> Result<InventoryRecord, StoreError> {
        let rows: Vec<InventoryRow> = self
            .update(
                INVENTORY,
                &[("id", eq(record.uuid))],
                &StockPatch::from(record),
            )
            .await?;

        Ok(InventoryRecord::try_from(single(rows, "inventory record")?)?)
    }

    #[instrument(skip(self))]
    async fn adjust_stock(&self, adjustment: &StockAdjustment) -> Result<(), StoreError> {
        self.rpc_unit("adjust_stock", &AdjustStockParams::from(adjustment))
            .await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn create_records(&self, records: &[InventoryRecord]) -> Result<Vec<InventoryRecord>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let rows = records.iter().map(NewInventoryRow::from).collect::<Vec<_>>();
        let inserted: Vec<InventoryRow> = self.insert(INVENTORY, &rows).await?;

        into_records(inserted)
    }

    #[instrument(skip(self))]
    async fn set_unit_cost(&self, record: InventoryUuid, unit_cost: Price) -> Result<(), StoreError> {
        let rows: Vec<InventoryRow> = self
            .update(
                INVENTORY,
                &[("id", eq(record))],
                &UnitCostPatch {
                    unit_cost: prices::to_decimal(unit_cost),
                },
            )
            .await?;

        single(rows, "inventory record").map(|_row| ())
    }
}
