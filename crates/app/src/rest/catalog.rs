//! Catalog over PostgREST.

use async_trait::async_trait;
use petshop::products::{Product, ProductUuid};
use tracing::instrument;

use crate::{
    domain::{CatalogService, StoreError},
    rest::{RestStore, eq, rows::MenuItemRow, single},
};

const MENU_ITEMS: &str = "menu_items";

const PRODUCT_SELECT: &str =
    "*,variations(*),add_ons(*),inventory(current_stock,is_tracked,is_out_of_stock)";

#[async_trait]
impl CatalogService for RestStore {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<MenuItemRow> = self
            .select(
                MENU_ITEMS,
                PRODUCT_SELECT,
                &[("order", "created_at.asc".to_string())],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product: ProductUuid) -> Result<Product, StoreError> {
        let rows: Vec<MenuItemRow> = self
            .select(MENU_ITEMS, PRODUCT_SELECT, &[("id", eq(product))])
            .await?;

        Ok(Product::try_from(single(rows, "product")?)?)
    }
}
