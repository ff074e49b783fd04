//! Discounts

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::MoneyError;

use crate::prices::{Price, zero};

/// A product's discount price and the window it applies in.
///
/// The window is wall-clock dependent, so it is evaluated on every read and
/// never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountWindow {
    /// Discounted price, ignored unless the window is active
    pub price: Option<Price>,

    /// Master switch set by staff
    pub active: bool,

    /// Inclusive start bound
    pub starts_at: Option<Timestamp>,

    /// Inclusive end bound
    pub ends_at: Option<Timestamp>,
}

impl DiscountWindow {
    /// No discount.
    #[must_use]
    pub fn none() -> Self {
        Self {
            price: None,
            active: false,
            starts_at: None,
            ends_at: None,
        }
    }

    /// An always-on discount at `price`.
    #[must_use]
    pub fn always(price: Price) -> Self {
        Self {
            price: Some(price),
            active: true,
            starts_at: None,
            ends_at: None,
        }
    }

    /// Sets the bounds and returns the window.
    #[must_use]
    pub fn between(mut self, starts_at: Option<Timestamp>, ends_at: Option<Timestamp>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Whether the discount applies at `now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.active
            && self.starts_at.is_none_or(|start| now >= start)
            && self.ends_at.is_none_or(|end| now <= end)
    }

    /// The discount price when it applies at `now`.
    pub fn price_at(&self, now: Timestamp) -> Option<Price> {
        self.price.filter(|_| self.is_active_at(now))
    }

    /// Amount saved against `base_price` at `now`; zero outside the window.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings(&self, base_price: Price, now: Timestamp) -> Result<Price, MoneyError> {
        match self.price_at(now) {
            Some(price) => base_price.sub(price),
            None => Ok(zero()),
        }
    }

    /// Savings as a whole-number fraction of `base_price`, for "% OFF" badges.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings_percent(&self, base_price: Price, now: Timestamp) -> Result<Percentage, MoneyError> {
        let savings = self.savings(base_price, now)?.to_minor_units();
        let base = base_price.to_minor_units();

        if base == 0 || savings == 0 {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        let points = (Decimal::from(savings) * Decimal::ONE_HUNDRED / Decimal::from(base))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        Ok(Percentage::from(points / Decimal::ONE_HUNDRED))
    }
}

impl Default for DiscountWindow {
    fn default() -> Self {
        Self::none()
    }
}

/// Whether `product`'s discount applies at `now`.
pub fn is_discount_active(product: &crate::products::Product, now: Timestamp) -> bool {
    product.discount.is_active_at(now)
}
