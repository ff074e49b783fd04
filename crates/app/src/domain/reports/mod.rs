//! Reports service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;

use crate::domain::StoreError;

pub mod models;

pub use models::*;

/// Aggregations run by stored procedures in the store.
#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Sales between two dates, inclusive. An empty range reports zeros.
    async fn sales_summary(&self, start: Date, end: Date) -> Result<SalesSummary, StoreError>;

    /// Best sellers over the last `days_back` days.
    async fn product_performance(&self, days_back: u32) -> Result<Vec<ProductPerformance>, StoreError>;

    async fn payment_breakdown(&self, days_back: u32) -> Result<Vec<PaymentBreakdown>, StoreError>;

    async fn staff_performance(&self, days_back: u32) -> Result<Vec<StaffPerformance>, StoreError>;

    async fn customer_analytics(&self) -> Result<CustomerAnalytics, StoreError>;

    async fn inventory_valuation(&self) -> Result<InventoryValuation, StoreError>;
}
