//! Report models.

use decimal_percentage::Percentage;
use jiff::civil::Date;
use petshop::{payments::PaymentMethod, prices::Price};
use rust_decimal::Decimal;

/// Totals over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub start: Date,
    pub end: Date,
    pub total_orders: u64,
    pub total_sales: Price,
    pub total_paid: Price,
    pub average_order_value: Price,
    pub total_customers: u64,
    pub total_items_sold: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPerformance {
    pub product_name: String,
    pub total_quantity: u64,
    pub times_ordered: u64,
    pub total_revenue: Price,

    /// Only when the product has a unit cost.
    pub profit_margin: Option<Percentage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentBreakdown {
    pub payment_method: PaymentMethod,
    pub total_amount: Price,
    pub transaction_count: u64,

    /// Share of the period's takings
    pub percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffPerformance {
    pub staff_name: String,
    pub total_orders: u64,
    pub total_sales: Price,
    pub average_order_value: Price,
    pub orders_per_day: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerAnalytics {
    pub total_customers: u64,
    pub active_customers: Option<u64>,
    pub total_loyalty_points: Option<u64>,
}

/// Valuation as computed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryValuation {
    pub total_value: Price,
    pub total_items: u64,
    pub low_stock_items: Option<u64>,
    pub out_of_stock_items: Option<u64>,
}
