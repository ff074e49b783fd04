//! Reports over PostgREST stored procedures.

use async_trait::async_trait;
use jiff::civil::Date;
use serde_json::json;
use tracing::instrument;

use crate::{
    domain::{
        CustomerAnalytics, InventoryValuation, PaymentBreakdown, ProductPerformance,
        ReportsService, SalesSummary, StaffPerformance, StoreError,
    },
    rest::{
        RestStore,
        rows::{
            CustomerAnalyticsRow, DateRangeParams, DaysBackParams, InventoryValuationRow,
            PaymentBreakdownRow, ProductPerformanceRow, SalesSummaryRow, StaffPerformanceRow,
        },
    },
};

/// Aggregate procedures return a set; an empty set reads as zeros.
fn first_or_default<T: Default>(rows: Vec<T>) -> T {
    rows.into_iter().next().unwrap_or_default()
}

fn convert<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = crate::domain::RowError>,
{
    Ok(rows
        .into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl ReportsService for RestStore {
    #[instrument(skip(self))]
    async fn sales_summary(&self, start: Date, end: Date) -> Result<SalesSummary, StoreError> {
        let rows: Vec<SalesSummaryRow> = self
            .rpc(
                "get_sales_by_date_range",
                &DateRangeParams {
                    start_date: start,
                    end_date: end,
                },
            )
            .await?;

        Ok(first_or_default(rows).into_summary(start, end)?)
    }

    #[instrument(skip(self))]
    async fn product_performance(&self, days_back: u32) -> Result<Vec<ProductPerformance>, StoreError> {
        let rows: Vec<ProductPerformanceRow> = self
            .rpc("get_product_performance", &DaysBackParams { days_back })
            .await?;

        convert(rows)
    }

    #[instrument(skip(self))]
    async fn payment_breakdown(&self, days_back: u32) -> Result<Vec<PaymentBreakdown>, StoreError> {
        let rows: Vec<PaymentBreakdownRow> = self
            .rpc("get_payment_method_breakdown", &DaysBackParams { days_back })
            .await?;

        convert(rows)
    }

    #[instrument(skip(self))]
    async fn staff_performance(&self, days_back: u32) -> Result<Vec<StaffPerformance>, StoreError> {
        let rows: Vec<StaffPerformanceRow> = self
            .rpc("get_staff_performance", &DaysBackParams { days_back })
            .await?;

        convert(rows)
    }

    #[instrument(skip(self))]
    async fn customer_analytics(&self) -> Result<CustomerAnalytics, StoreError> {
        let rows: Vec<CustomerAnalyticsRow> = self.rpc("get_customer_analytics", &json!({})).await?;

        Ok(CustomerAnalytics::try_from(first_or_default(rows))?)
    }

    #[instrument(skip(self))]
    async fn inventory_valuation(&self) -> Result<InventoryValuation, StoreError> {
        let rows: Vec<InventoryValuationRow> = self.rpc("get_inventory_valuation", &json!({})).await?;

        Ok(InventoryValuation::try_from(first_or_default(rows))?)
    }
}
