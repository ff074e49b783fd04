//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{ConfigError, SaleConfig, StoreConfig},
    domain::{
        CatalogService, CustomersService, InventoryService, OrdersService, PaymentsService,
        ReportsService, StoreError,
    },
    maintenance::InventoryMaintenance,
    pending::PendingPayments,
    rest::RestStore,
    sales::SalesService,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build store client")]
    Store(#[source] StoreError),
}

#[derive(Clone)]
pub struct AppContext {
    pub shop_name: String,
    pub catalog: Arc<dyn CatalogService>,
    pub customers: Arc<dyn CustomersService>,
    pub reports: Arc<dyn ReportsService>,
    pub sales: SalesService,
    pub pending: PendingPayments,
    pub maintenance: InventoryMaintenance,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("shop_name", &self.shop_name)
            .field("sales", &self.sales)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context against the hosted store.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid store URL, settle window or stock
    /// defaults, or when the HTTP client cannot be built.
    pub fn from_config(store: &StoreConfig, sale: &SaleConfig) -> Result<Self, AppInitError> {
        let rest = RestStore::new(store.base_url()?, store.store_anon_key.as_str(), store.timeout())
            .map_err(AppInitError::Store)?;

        Self::with_store(Arc::new(rest), sale)
    }

    /// Build application context over any store implementing every service.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid settle window or stock defaults.
    pub fn with_store<S>(store: Arc<S>, sale: &SaleConfig) -> Result<Self, AppInitError>
    where
        S: CatalogService
            + CustomersService
            + InventoryService
            + OrdersService
            + PaymentsService
            + ReportsService
            + 'static,
    {
        let orders: Arc<dyn OrdersService> = store.clone();
        let payments: Arc<dyn PaymentsService> = store.clone();
        let inventory: Arc<dyn InventoryService> = store.clone();
        let catalog: Arc<dyn CatalogService> = store.clone();

        Ok(Self {
            shop_name: sale.shop_name.clone(),
            sales: SalesService::new(
                orders.clone(),
                payments.clone(),
                inventory.clone(),
                sale.settle_window()?,
            ),
            pending: PendingPayments::new(orders, payments),
            maintenance: InventoryMaintenance::new(catalog.clone(), inventory, sale.inventory_defaults()?),
            catalog,
            customers: store.clone(),
            reports: store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> StoreConfig {
        StoreConfig {
            store_url: url.to_string(),
            store_anon_key: "anon".to_string(),
            store_timeout_seconds: 5,
        }
    }

    #[test]
    fn builds_against_a_valid_url() {
        let context = AppContext::from_config(&store("https://shop.example.com/"), &SaleConfig::default());

        assert!(context.is_ok_and(|context| context.shop_name == "Petshop"));
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            AppContext::from_config(&store("shop.example.com"), &SaleConfig::default()),
            Err(AppInitError::Config(ConfigError::InvalidStoreUrl(_)))
        ));

        let sale = SaleConfig {
            settle_poll_ms: 0,
            ..SaleConfig::default()
        };

        assert!(matches!(
            AppContext::from_config(&store("https://shop.example.com"), &sale),
            Err(AppInitError::Config(ConfigError::ZeroPollInterval))
        ));
    }
}
