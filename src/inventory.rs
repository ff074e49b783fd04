//! Inventory
//!
//! Stock records and the flags derived from them. Flags are recomputed on every
//! write, never patched on their own.

use jiff::Timestamp;
use rusty_money::MoneyError;
use thiserror::Error;

use crate::{
    prices::{Price, zero},
    pricing::{PricingError, line_total},
    products::{ProductUuid, StockLevel},
    uuids::TypedUuid,
};

/// Inventory record Id
pub type InventoryUuid = TypedUuid<InventoryRecord>;

/// Starting figures for records created by a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryDefaults {
    /// Opening stock
    pub starting_stock: i64,

    /// Low-stock threshold
    pub minimum_stock: i64,

    /// Shelf capacity
    pub maximum_stock: i64,
}

impl Default for InventoryDefaults {
    fn default() -> Self {
        Self {
            starting_stock: 100,
            minimum_stock: 10,
            maximum_stock: 200,
        }
    }
}

/// Errors from inventory maintenance.
#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    /// Stock can't be set below zero.
    #[error("stock cannot be set to {0}")]
    NegativeStock(i64),

    /// Adjustments need a reason for the audit trail.
    #[error("a reason is required to adjust stock")]
    MissingReason,

    /// Valuation arithmetic overflowed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Derived stock flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockFlags {
    /// At or below the minimum
    pub low: bool,

    /// Nothing left
    pub out: bool,
}

impl StockFlags {
    /// Flags for `stock` against `minimum`.
    pub fn compute(stock: i64, minimum: i64) -> Self {
        Self {
            low: stock <= minimum,
            out: stock <= 0,
        }
    }
}

/// Stock record for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    /// Record id
    pub uuid: InventoryUuid,

    /// Product stocked
    pub product: ProductUuid,

    /// Product name, when joined
    pub product_name: Option<String>,

    /// Units on hand, transiently negative if a decrement overshot
    pub current_stock: i64,

    /// Low-stock threshold
    pub minimum_stock: i64,

    /// Shelf capacity
    pub maximum_stock: Option<i64>,

    /// Cost per unit, zero when unknown
    pub unit_cost: Price,

    /// Whether sales decrement this record
    pub tracked: bool,

    /// Derived flags
    pub flags: StockFlags,

    /// Last write
    pub updated_at: Option<Timestamp>,
}

impl InventoryRecord {
    /// A fresh tracked record from sync defaults, costed at `unit_cost`.
    #[must_use]
    pub fn new(product: ProductUuid, defaults: InventoryDefaults, unit_cost: Price) -> Self {
        Self {
            uuid: InventoryUuid::new(),
            product,
            product_name: None,
            current_stock: defaults.starting_stock,
            minimum_stock: defaults.minimum_stock,
            maximum_stock: Some(defaults.maximum_stock),
            unit_cost,
            tracked: true,
            flags: StockFlags::compute(defaults.starting_stock, defaults.minimum_stock),
            updated_at: None,
        }
    }

    /// The record with `stock` units on hand and flags recomputed.
    #[must_use]
    pub fn with_stock(mut self, stock: i64, now: Timestamp) -> Self {
        self.current_stock = stock;
        self.flags = StockFlags::compute(stock, self.minimum_stock);
        self.updated_at = Some(now);
        self
    }

    /// Flags as they should be for the current stock.
    pub fn expected_flags(&self) -> StockFlags {
        StockFlags::compute(self.current_stock, self.minimum_stock)
    }

    /// Whether the stored flags disagree with the stock.
    pub fn has_stale_flags(&self) -> bool {
        self.flags != self.expected_flags()
    }

    /// Low or out.
    pub fn needs_attention(&self) -> bool {
        self.tracked && (self.flags.low || self.flags.out)
    }

    /// The record clamped to zero when stock went negative.
    pub fn repair_negative(&self, now: Timestamp) -> Option<Self> {
        (self.current_stock < 0).then(|| self.clone().with_stock(0, now))
    }

    /// Whether the unit cost still needs a value.
    pub fn needs_unit_cost(&self) -> bool {
        self.unit_cost.to_minor_units() <= 0
    }

    /// Value on hand. Negative stock is worth nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Pricing`] on overflow.
    pub fn value(&self) -> Result<Price, InventoryError> {
        let units = u32::try_from(self.current_stock.max(0)).unwrap_or(u32::MAX);

        Ok(line_total(self.unit_cost, units)?)
    }

    /// Stock level as seen by the catalog.
    pub fn level(&self) -> StockLevel {
        StockLevel {
            current: self.current_stock,
            tracked: self.tracked,
            out_of_stock: self.flags.out,
        }
    }
}

/// Totals across tracked records.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    /// Σ stock × unit cost
    pub total_value: Price,

    /// Tracked records
    pub total_items: usize,

    /// Records at or below their minimum
    pub low_stock_items: usize,

    /// Records with nothing left
    pub out_of_stock_items: usize,
}

/// Values every tracked record.
///
/// # Errors
///
/// Returns [`InventoryError`] on overflow.
pub fn valuation<'a>(records: impl IntoIterator<Item = &'a InventoryRecord>) -> Result<Valuation, InventoryError> {
    let mut total = Valuation {
        total_value: zero(),
        total_items: 0,
        low_stock_items: 0,
        out_of_stock_items: 0,
    };

    for record in records.into_iter().filter(|record| record.tracked) {
        total.total_value = total.total_value.add(record.value()?)?;
        total.total_items += 1;

        let flags = record.expected_flags();

        if flags.out {
            total.out_of_stock_items += 1;
        } else if flags.low {
            total.low_stock_items += 1;
        }
    }

    Ok(total)
}

/// A manual stock count to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    /// Product counted
    pub product: ProductUuid,

    /// Counted units
    pub new_quantity: i64,

    /// Why the count changed
    pub reason: String,
}

impl StockAdjustment {
    /// Validates a manual adjustment.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NegativeStock`]: `new_quantity` below zero.
    /// - [`InventoryError::MissingReason`]: blank reason.
    pub fn new(
        product: ProductUuid,
        new_quantity: i64,
        reason: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        if new_quantity < 0 {
            return Err(InventoryError::NegativeStock(new_quantity));
        }

        let reason = reason.into().trim().to_string();

        if reason.is_empty() {
            return Err(InventoryError::MissingReason);
        }

        Ok(Self {
            product,
            new_quantity,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::prices::pesos;

    use super::*;

    fn record(stock: i64) -> InventoryRecord {
        InventoryRecord::new(ProductUuid::new(), InventoryDefaults::default(), pesos(40))
            .with_stock(stock, Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn flags_follow_stock() {
        assert_eq!(record(11).flags, StockFlags { low: false, out: false });
        assert_eq!(record(10).flags, StockFlags { low: true, out: false });
        assert_eq!(record(0).flags, StockFlags { low: true, out: true });
        assert_eq!(record(-2).flags, StockFlags { low: true, out: true });
    }

    #[test]
    fn sync_defaults() {
        let record = InventoryRecord::new(ProductUuid::new(), InventoryDefaults::default(), pesos(250));

        assert_eq!(record.current_stock, 100);
        assert_eq!(record.minimum_stock, 10);
        assert_eq!(record.maximum_stock, Some(200));
        assert_eq!(record.unit_cost, pesos(250));
        assert!(!record.needs_attention());
    }

    #[test]
    fn repair_negative_clamps_to_zero() {
        let repaired = record(-3).repair_negative(Timestamp::UNIX_EPOCH);

        assert_eq!(repaired.map(|r| (r.current_stock, r.flags.out)), Some((0, true)));
        assert_eq!(record(3).repair_negative(Timestamp::UNIX_EPOCH), None);
    }

    #[test]
    fn stale_flags_are_detected() {
        let mut stale = record(0);
        stale.current_stock = 50;

        assert!(stale.has_stale_flags());
        assert!(!record(50).has_stale_flags());
    }

    #[test]
    fn valuation_sums_tracked_records() -> TestResult {
        let mut untracked = record(10);
        untracked.tracked = false;

        let records = [record(3), record(0), record(-1), record(20), untracked];
        let total = valuation(&records)?;

        assert_eq!(total.total_value, pesos(920));
        assert_eq!(total.total_items, 4);
        assert_eq!(total.low_stock_items, 1);
        assert_eq!(total.out_of_stock_items, 2);

        Ok(())
    }

    #[test]
    fn adjustment_validation() {
        let product = ProductUuid::new();

        assert_eq!(
            StockAdjustment::new(product, -1, "count"),
            Err(InventoryError::NegativeStock(-1))
        );
        assert_eq!(
            StockAdjustment::new(product, 5, "  "),
            Err(InventoryError::MissingReason)
        );
        assert!(StockAdjustment::new(product, 0, "damaged").is_ok());
    }
}
