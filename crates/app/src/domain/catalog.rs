//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use petshop::products::{Product, ProductUuid};

use crate::domain::StoreError;

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Products with their variations, add-ons and stock, oldest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// A single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, StoreError>;
}
