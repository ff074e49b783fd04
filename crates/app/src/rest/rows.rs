//! Wire rows
//!
//! Serde shapes of the store's tables and procedures. Rows are validated into
//! domain values here and nowhere else.

use decimal_percentage::Percentage;
use jiff::{Timestamp, civil::Date};
use petshop::{
    customers::{Customer, CustomerUuid, NewCustomer, PetProfile},
    discounts::DiscountWindow,
    inventory::{InventoryRecord, InventoryUuid, StockAdjustment, StockFlags},
    orders::{Order, OrderDraft, OrderLine, OrderStatus, OrderType, OrderUuid, PaymentStatus},
    payments::{NewPayment, Payment, PaymentMethod, PaymentUuid},
    prices::{self, Price, zero},
    products::{AddOn, AddOnUuid, Product, ProductUuid, StockLevel, Variation, VariationUuid},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    CustomerAnalytics, InventoryValuation, PaymentBreakdown, ProductPerformance, RowError,
    SalesSummary, StaffPerformance,
};

/// Embedded relations come back as an object or a one-element array
/// depending on how the foreign key is declared.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.into_iter().next(),
        }
    }
}

fn price(field: &'static str, value: Decimal) -> Result<Price, RowError> {
    prices::from_decimal(value).map_err(|_err| RowError::InvalidAmount { field, value })
}

fn price_or_zero(field: &'static str, value: Option<Decimal>) -> Result<Price, RowError> {
    value.map_or_else(|| Ok(zero()), |value| price(field, value))
}

fn count(field: &'static str, value: Option<i64>) -> Result<u64, RowError> {
    let value = value.unwrap_or_default();

    u64::try_from(value).map_err(|_err| RowError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn small_count(field: &'static str, value: Option<i64>) -> Result<u32, RowError> {
    let value = count(field, value)?;

    u32::try_from(value).map_err(|_err| RowError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

/// Percent points as stored, e.g. `35.5`, as a fraction.
fn percent_points(value: Decimal) -> Percentage {
    Percentage::from(value / Decimal::ONE_HUNDRED)
}

// Catalog

#[derive(Debug, Deserialize)]
pub(crate) struct MenuItemRow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub base_price: Decimal,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub discount_active: Option<bool>,
    #[serde(default)]
    pub discount_start_date: Option<Timestamp>,
    #[serde(default)]
    pub discount_end_date: Option<Timestamp>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub popular: Option<bool>,
    #[serde(default)]
    pub variations: Vec<VariationRow>,
    #[serde(default)]
    pub add_ons: Vec<AddOnRow>,
    #[serde(default)]
    pub inventory: Option<OneOrMany<StockRow>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariationRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddOnRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StockRow {
    pub current_stock: i64,
    #[serde(default)]
    pub is_tracked: bool,
    #[serde(default)]
    pub is_out_of_stock: bool,
}

impl TryFrom<MenuItemRow> for Product {
    type Error = RowError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let variations = row
            .variations
            .into_iter()
            .map(|variation| -> Result<Variation, RowError> {
                Ok(Variation {
                    uuid: VariationUuid::from_uuid(variation.id),
                    name: variation.name,
                    price_delta: price("variations.price", variation.price)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let add_ons = row
            .add_ons
            .into_iter()
            .map(|add_on| -> Result<AddOn, RowError> {
                Ok(AddOn {
                    uuid: AddOnUuid::from_uuid(add_on.id),
                    name: add_on.name,
                    price: price("add_ons.price", add_on.price)?,
                    category: add_on.category.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let discount = DiscountWindow {
            price: row
                .discount_price
                .map(|value| price("discount_price", value))
                .transpose()?,
            active: row.discount_active.unwrap_or(false),
            starts_at: row.discount_start_date,
            ends_at: row.discount_end_date,
        };

        let stock = row
            .inventory
            .and_then(OneOrMany::into_first)
            .map(|stock| StockLevel {
                current: stock.current_stock,
                tracked: stock.is_tracked,
                out_of_stock: stock.is_out_of_stock,
            });

        Ok(Product {
            uuid: ProductUuid::from_uuid(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            base_price: price("base_price", row.base_price)?,
            discount,
            available: row.available.unwrap_or(true),
            popular: row.popular.unwrap_or(false),
            variations,
            add_ons,
            stock,
        })
    }
}

// Inventory

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryRow {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub current_stock: i64,
    #[serde(default)]
    pub minimum_stock: Option<i64>,
    #[serde(default)]
    pub maximum_stock: Option<i64>,
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    #[serde(default = "tracked_by_default")]
    pub is_tracked: bool,
    #[serde(default)]
    pub is_low_stock: bool,
    #[serde(default)]
    pub is_out_of_stock: bool,
    #[serde(default)]
    pub last_stock_update: Option<Timestamp>,
    #[serde(default)]
    pub menu_items: Option<MenuItemSummaryRow>,
}

fn tracked_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct MenuItemSummaryRow {
    pub name: String,
}

/// Threshold the store falls back to when a record has none.
const FALLBACK_MINIMUM_STOCK: i64 = 10;

impl TryFrom<InventoryRow> for InventoryRecord {
    type Error = RowError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        Ok(InventoryRecord {
            uuid: InventoryUuid::from_uuid(row.id),
            product: ProductUuid::from_uuid(row.menu_item_id),
            product_name: row.menu_items.map(|item| item.name),
            current_stock: row.current_stock,
            minimum_stock: row.minimum_stock.unwrap_or(FALLBACK_MINIMUM_STOCK),
            maximum_stock: row.maximum_stock,
            unit_cost: price_or_zero("unit_cost", row.unit_cost)?,
            tracked: row.is_tracked,
            flags: StockFlags {
                low: row.is_low_stock,
                out: row.is_out_of_stock,
            },
            updated_at: row.last_stock_update,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewInventoryRow {
    pub menu_item_id: Uuid,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub maximum_stock: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_cost: Decimal,
    pub is_tracked: bool,
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
}

impl From<&InventoryRecord> for NewInventoryRow {
    fn from(record: &InventoryRecord) -> Self {
        let flags = record.expected_flags();
        let cost = prices::to_decimal(record.unit_cost);

        Self {
            menu_item_id: record.product.into_uuid(),
            current_stock: record.current_stock,
            minimum_stock: record.minimum_stock,
            maximum_stock: record.maximum_stock,
            unit_cost: cost,
            average_cost: cost,
            is_tracked: record.tracked,
            is_low_stock: flags.low,
            is_out_of_stock: flags.out,
        }
    }
}

/// Absolute stock write. Flags always travel with the stock they describe.
#[derive(Debug, Serialize)]
pub(crate) struct StockPatch {
    pub current_stock: i64,
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
    pub last_stock_update: Option<Timestamp>,
}

impl From<&InventoryRecord> for StockPatch {
    fn from(record: &InventoryRecord) -> Self {
        let flags = record.expected_flags();

        Self {
            current_stock: record.current_stock,
            is_low_stock: flags.low,
            is_out_of_stock: flags.out,
            last_stock_update: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UnitCostPatch {
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdjustStockParams {
    pub p_menu_item_id: Uuid,
    pub p_new_quantity: i64,
    pub p_staff_id: Option<Uuid>,
    pub p_reason: String,
}

impl From<&StockAdjustment> for AdjustStockParams {
    fn from(adjustment: &StockAdjustment) -> Self {
        Self {
            p_menu_item_id: adjustment.product.into_uuid(),
            p_new_quantity: adjustment.new_quantity,
            p_staff_id: None,
            p_reason: adjustment.reason.clone(),
        }
    }
}

// Orders

#[derive(Debug, Deserialize)]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub order_type: OrderType,
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_amount: Option<Decimal>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: Timestamp,
    #[serde(default)]
    pub paid_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RowError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            uuid: OrderUuid::from_uuid(row.id),
            number: row.order_number,
            order_type: row.order_type,
            customer: row.customer_id.map(CustomerUuid::from_uuid),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            subtotal: price("subtotal", row.subtotal)?,
            discount: price_or_zero("discount_amount", row.discount_amount)?,
            delivery_fee: price_or_zero("delivery_fee", row.delivery_fee)?,
            total: price("total_amount", row.total_amount)?,
            payment_status: row.payment_status,
            status: row.order_status,
            ordered_at: row.created_at,
            paid_at: row.paid_at,
            completed_at: row.completed_at,
        })
    }
}

/// Orders are inserted pending/pending; completion moves them on.
#[derive(Debug, Serialize)]
pub(crate) struct NewOrderRow {
    pub order_number: String,
    pub customer_id: Option<Uuid>,
    pub order_type: OrderType,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub order_date: Timestamp,
}

impl NewOrderRow {
    pub fn new(draft: &OrderDraft, now: Timestamp) -> Self {
        Self {
            order_number: draft.number.clone(),
            customer_id: draft.customer.map(CustomerUuid::into_uuid),
            order_type: draft.order_type,
            customer_name: draft.customer_name.clone(),
            customer_phone: draft.customer_phone.clone(),
            subtotal: prices::to_decimal(draft.subtotal),
            discount_amount: prices::to_decimal(draft.discount),
            delivery_fee: prices::to_decimal(draft.delivery_fee),
            total_amount: prices::to_decimal(draft.total),
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            order_date: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderItemRow {
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderItemRow {
    pub fn new(order: OrderUuid, line: &OrderLine) -> Self {
        Self {
            order_id: order.into_uuid(),
            menu_item_id: line.product.into_uuid(),
            item_name: line.name.clone(),
            unit_price: prices::to_decimal(line.unit_price),
            quantity: line.quantity,
            total_price: prices::to_decimal(line.total),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteOrderPatch {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
    pub completed_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkPaidPatch {
    pub payment_status: PaymentStatus,
    pub paid_at: Timestamp,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
}

// Payments

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub payment_number: String,
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    #[serde(default)]
    pub reference_number: Option<String>,
    pub created_at: Timestamp,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RowError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            uuid: PaymentUuid::from_uuid(row.id),
            number: row.payment_number,
            order: OrderUuid::from_uuid(row.order_id),
            method: row.payment_method,
            amount: price("amount", row.amount)?,
            reference: row.reference_number,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPaymentRow {
    pub payment_number: String,
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub reference_number: Option<String>,
    pub payment_status: &'static str,
}

impl From<NewPayment> for NewPaymentRow {
    fn from(payment: NewPayment) -> Self {
        Self {
            payment_number: payment.number,
            order_id: payment.order.into_uuid(),
            payment_method: payment.method,
            amount: prices::to_decimal(payment.amount),
            reference_number: payment.reference,
            payment_status: "completed",
        }
    }
}

// Customers

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub customer_code: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub pet_breed: Option<String>,
    #[serde(default)]
    pub pet_age: Option<i64>,
    #[serde(default)]
    pub total_orders: Option<i64>,
    #[serde(default)]
    pub total_spent: Option<Decimal>,
    #[serde(default)]
    pub loyalty_points: Option<i64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RowError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let age = row
            .pet_age
            .map(|age| {
                u8::try_from(age).map_err(|_err| RowError::InvalidValue {
                    field: "pet_age",
                    value: age.to_string(),
                })
            })
            .transpose()?;

        Ok(Customer {
            uuid: CustomerUuid::from_uuid(row.id),
            code: row.customer_code,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            pet: PetProfile {
                name: row.pet_name,
                kind: row.pet_type,
                breed: row.pet_breed,
                age,
            },
            total_orders: small_count("total_orders", row.total_orders)?,
            total_spent: price_or_zero("total_spent", row.total_spent)?,
            loyalty_points: small_count("loyalty_points", row.loyalty_points)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCustomerRow {
    pub customer_code: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_age: Option<u8>,
}

impl From<NewCustomer> for NewCustomerRow {
    fn from(customer: NewCustomer) -> Self {
        Self {
            customer_code: customer.code,
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
            pet_name: customer.pet.name,
            pet_type: customer.pet.kind,
            pet_breed: customer.pet.breed,
            pet_age: customer.pet.age,
        }
    }
}

// Reports

#[derive(Debug, Serialize)]
pub(crate) struct DateRangeParams {
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Serialize)]
pub(crate) struct DaysBackParams {
    pub days_back: u32,
}

/// Aggregates over no rows come back as nulls.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SalesSummaryRow {
    #[serde(default)]
    pub total_orders: Option<i64>,
    #[serde(default)]
    pub total_sales: Option<Decimal>,
    #[serde(default)]
    pub total_paid: Option<Decimal>,
    #[serde(default)]
    pub average_order_value: Option<Decimal>,
    #[serde(default)]
    pub total_customers: Option<i64>,
    #[serde(default)]
    pub total_items_sold: Option<i64>,
}

impl SalesSummaryRow {
    pub fn into_summary(self, start: Date, end: Date) -> Result<SalesSummary, RowError> {
        Ok(SalesSummary {
            start,
            end,
            total_orders: count("total_orders", self.total_orders)?,
            total_sales: price_or_zero("total_sales", self.total_sales)?,
            total_paid: price_or_zero("total_paid", self.total_paid)?,
            average_order_value: price_or_zero("average_order_value", self.average_order_value)?,
            total_customers: count("total_customers", self.total_customers)?,
            total_items_sold: count("total_items_sold", self.total_items_sold)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductPerformanceRow {
    pub product_name: String,
    #[serde(default)]
    pub total_quantity: Option<i64>,
    #[serde(default)]
    pub times_ordered: Option<i64>,
    #[serde(default)]
    pub total_revenue: Option<Decimal>,
    #[serde(default)]
    pub profit_margin: Option<Decimal>,
}

impl TryFrom<ProductPerformanceRow> for ProductPerformance {
    type Error = RowError;

    fn try_from(row: ProductPerformanceRow) -> Result<Self, Self::Error> {
        Ok(ProductPerformance {
            product_name: row.product_name,
            total_quantity: count("total_quantity", row.total_quantity)?,
            times_ordered: count("times_ordered", row.times_ordered)?,
            total_revenue: price_or_zero("total_revenue", row.total_revenue)?,
            profit_margin: row.profit_margin.map(percent_points),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentBreakdownRow {
    pub payment_method: String,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub transaction_count: Option<i64>,
    #[serde(default)]
    pub percentage: Option<Decimal>,
}

impl TryFrom<PaymentBreakdownRow> for PaymentBreakdown {
    type Error = RowError;

    fn try_from(row: PaymentBreakdownRow) -> Result<Self, Self::Error> {
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_err| RowError::InvalidValue {
                field: "payment_method",
                value: row.payment_method.clone(),
            })?;

        Ok(PaymentBreakdown {
            payment_method,
            total_amount: price_or_zero("total_amount", row.total_amount)?,
            transaction_count: count("transaction_count", row.transaction_count)?,
            percentage: percent_points(row.percentage.unwrap_or_default()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffPerformanceRow {
    pub staff_name: String,
    #[serde(default)]
    pub total_orders: Option<i64>,
    #[serde(default)]
    pub total_sales: Option<Decimal>,
    #[serde(default)]
    pub average_order_value: Option<Decimal>,
    #[serde(default)]
    pub orders_per_day: Option<Decimal>,
}

impl TryFrom<StaffPerformanceRow> for StaffPerformance {
    type Error = RowError;

    fn try_from(row: StaffPerformanceRow) -> Result<Self, Self::Error> {
        Ok(StaffPerformance {
            staff_name: row.staff_name,
            total_orders: count("total_orders", row.total_orders)?,
            total_sales: price_or_zero("total_sales", row.total_sales)?,
            average_order_value: price_or_zero("average_order_value", row.average_order_value)?,
            orders_per_day: row.orders_per_day.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CustomerAnalyticsRow {
    #[serde(default)]
    pub total_customers: Option<i64>,
    #[serde(default)]
    pub active_customers: Option<i64>,
    #[serde(default)]
    pub total_loyalty_points: Option<i64>,
}

impl TryFrom<CustomerAnalyticsRow> for CustomerAnalytics {
    type Error = RowError;

    fn try_from(row: CustomerAnalyticsRow) -> Result<Self, Self::Error> {
        Ok(CustomerAnalytics {
            total_customers: count("total_customers", row.total_customers)?,
            active_customers: row
                .active_customers
                .map(|value| count("active_customers", Some(value)))
                .transpose()?,
            total_loyalty_points: row
                .total_loyalty_points
                .map(|value| count("total_loyalty_points", Some(value)))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryValuationRow {
    #[serde(default)]
    pub total_value: Option<Decimal>,
    #[serde(default)]
    pub total_items: Option<i64>,
    #[serde(default)]
    pub low_stock_items: Option<i64>,
    #[serde(default)]
    pub out_of_stock_items: Option<i64>,
}

impl TryFrom<InventoryValuationRow> for InventoryValuation {
    type Error = RowError;

    fn try_from(row: InventoryValuationRow) -> Result<Self, Self::Error> {
        Ok(InventoryValuation {
            total_value: price_or_zero("total_value", row.total_value)?,
            total_items: count("total_items", row.total_items)?,
            low_stock_items: row
                .low_stock_items
                .map(|value| count("low_stock_items", Some(value)))
                .transpose()?,
            out_of_stock_items: row
                .out_of_stock_items
                .map(|value| count("out_of_stock_items", Some(value)))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use petshop::prices::{centavos, pesos};
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn menu_item_with_embedded_inventory_array() -> TestResult {
        let row: MenuItemRow = serde_json::from_value(json!({
            "id": "0199f0a2-6b1c-7d3e-8f40-1a2b3c4d5e6f",
            "name": "Kibble",
            "base_price": 100,
            "discount_price": 79.5,
            "discount_active": true,
            "discount_start_date": "2026-10-01T00:00:00+00:00",
            "category": "food",
            "variations": [{ "id": "0199f0a2-6b1c-7d3e-8f40-000000000001", "name": "5kg", "price": 20 }],
            "add_ons": [{ "id": "0199f0a2-6b1c-7d3e-8f40-000000000002", "name": "Dental Chew", "price": 10 }],
            "inventory": [{ "current_stock": 10, "is_tracked": true, "is_out_of_stock": false }]
        }))?;

        let product = Product::try_from(row)?;

        assert_eq!(product.base_price, pesos(100));
        assert_eq!(product.discount.price, Some(centavos(7_950)));
        assert!(product.discount.active);
        assert!(product.discount.starts_at.is_some());
        assert_eq!(product.variations.first().map(|v| v.price_delta), Some(pesos(20)));
        assert_eq!(product.add_ons.first().map(|a| a.category.as_str()), Some(""));
        assert_eq!(product.stock, Some(StockLevel::tracked(10)));
        assert!(product.available);

        Ok(())
    }

    #[test]
    fn menu_item_with_embedded_inventory_object() -> TestResult {
        let row: MenuItemRow = serde_json::from_value(json!({
            "id": "0199f0a2-6b1c-7d3e-8f40-1a2b3c4d5e6f",
            "name": "Catnip",
            "base_price": "85.00",
            "available": true,
            "inventory": { "current_stock": 0, "is_tracked": true, "is_out_of_stock": true }
        }))?;

        let product = Product::try_from(row)?;

        assert!(!product.is_available());
        assert!(product.variations.is_empty());

        Ok(())
    }

    #[test]
    fn inventory_row_defaults() -> TestResult {
        let row: InventoryRow = serde_json::from_value(json!({
            "id": "0199f0a2-6b1c-7d3e-8f40-1a2b3c4d5e6f",
            "menu_item_id": "0199f0a2-6b1c-7d3e-8f40-000000000001",
            "current_stock": 4,
            "unit_cost": null,
            "is_low_stock": true,
            "menu_items": { "name": "Kibble", "base_price": 100, "category": "food" }
        }))?;

        let record = InventoryRecord::try_from(row)?;

        assert_eq!(record.product_name.as_deref(), Some("Kibble"));
        assert_eq!(record.minimum_stock, 10);
        assert!(record.tracked);
        assert!(record.needs_unit_cost());
        assert!(!record.has_stale_flags());

        Ok(())
    }

    #[test]
    fn stock_patch_recomputes_flags() -> TestResult {
        let record = InventoryRecord::try_from(serde_json::from_value::<InventoryRow>(json!({
            "id": "0199f0a2-6b1c-7d3e-8f40-1a2b3c4d5e6f",
            "menu_item_id": "0199f0a2-6b1c-7d3e-8f40-000000000001",
            "current_stock": 50,
            "minimum_stock": 10
        }))?)?
        .with_stock(7, Timestamp::UNIX_EPOCH);

        let patch = serde_json::to_value(StockPatch::from(&record))?;

        assert_eq!(patch["current_stock"], json!(7));
        assert_eq!(patch["is_low_stock"], json!(true));
        assert_eq!(patch["is_out_of_stock"], json!(false));

        Ok(())
    }

    #[test]
    fn new_order_row_is_pending_with_numeric_amounts() -> TestResult {
        let draft = OrderDraft::new(
            "ORD-20261018-0001".to_string(),
            OrderType::InStore,
            vec![OrderLine::new(ProductUuid::new(), "Kibble", centavos(14_550), 2)?],
        )?;

        let row = serde_json::to_value(NewOrderRow::new(&draft, Timestamp::UNIX_EPOCH))?;

        assert_eq!(row["order_type"], json!("in-store"));
        assert_eq!(row["payment_status"], json!("pending"));
        assert_eq!(row["order_status"], json!("pending"));
        assert_eq!(row["total_amount"], json!(291.0));

        Ok(())
    }

    #[test]
    fn negative_counts_are_rejected() {
        let row = ProductPerformanceRow {
            product_name: "Kibble".to_string(),
            total_quantity: Some(-1),
            times_ordered: None,
            total_revenue: None,
            profit_margin: None,
        };

        assert_eq!(
            ProductPerformance::try_from(row),
            Err(RowError::InvalidValue {
                field: "total_quantity",
                value: "-1".to_string()
            })
        );
    }

    #[test]
    fn breakdown_percentage_is_a_fraction() -> TestResult {
        let row: PaymentBreakdownRow = serde_json::from_value(json!({
            "payment_method": "gcash",
            "total_amount": 1500.5,
            "transaction_count": 3,
            "percentage": 25
        }))?;

        let breakdown = PaymentBreakdown::try_from(row)?;

        assert_eq!(breakdown.payment_method, PaymentMethod::Gcash);
        assert_eq!(breakdown.total_amount, centavos(150_050));
        assert_eq!(breakdown.percentage, Percentage::from(Decimal::new(25, 2)));

        Ok(())
    }
}
