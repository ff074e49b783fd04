//! Pricing
//!
//! Computes the unit price of a cart selection. Everything here is pure: the
//! same product, selection and instant always produce the same price.

use jiff::Timestamp;
use rusty_money::MoneyError;
use thiserror::Error;

use crate::{
    prices::{Price, centavos, zero},
    products::{AddOn, AddOnUuid, Product, Variation, VariationUuid},
};

/// Errors that can occur while pricing a selection.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The variation is not offered for the product.
    #[error("variation {1} is not offered for {0}")]
    UnknownVariation(String, VariationUuid),

    /// The add-on is not offered for the product.
    #[error("add-on {1} is not offered for {0}")]
    UnknownAddOn(String, AddOnUuid),

    /// Price arithmetic overflowed.
    #[error("price calculation overflowed")]
    Overflow,

    /// Deltas pushed the unit price below zero.
    #[error("selection for {0} prices below zero")]
    NegativePrice(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// An add-on chosen for a line, with how many of it go on each unit.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnSelection {
    /// The chosen add-on
    pub add_on: AddOn,

    /// Units of the add-on per unit of product
    pub quantity: u32,
}

impl AddOnSelection {
    /// A selection of `quantity` units of `add_on`.
    #[must_use]
    pub fn new(add_on: AddOn, quantity: u32) -> Self {
        Self { add_on, quantity }
    }

    /// The add-on's contribution to the unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the multiplication overflows.
    pub fn subtotal(&self) -> Result<Price, PricingError> {
        line_total(self.add_on.price, self.quantity)
    }
}

/// Price of the product before variation and add-ons: the discount price when
/// the discount applies at `now`, otherwise the base price.
pub fn effective_base(product: &Product, now: Timestamp) -> Price {
    product.discount.price_at(now).unwrap_or(product.base_price)
}

/// Computes the unit price of `product` with the given variation and add-ons at `now`.
///
/// The variation delta is added to the discount-aware base, so the discount
/// applies underneath the variation. Each add-on contributes its price times
/// its quantity.
///
/// # Errors
///
/// - [`PricingError::UnknownVariation`] / [`PricingError::UnknownAddOn`]: the
///   selection does not belong to `product`.
/// - [`PricingError::Overflow`]: arithmetic overflowed.
/// - [`PricingError::NegativePrice`]: a negative delta pushed the price below zero.
pub fn unit_price(
    product: &Product,
    variation: Option<&Variation>,
    add_ons: &[AddOnSelection],
    now: Timestamp,
) -> Result<Price, PricingError> {
    let mut price = effective_base(product, now);

    if let Some(variation) = variation {
        if product.variation(variation.uuid).is_none() {
            return Err(PricingError::UnknownVariation(
                product.name.clone(),
                variation.uuid,
            ));
        }

        price = price.add(variation.price_delta)?;
    }

    for selection in add_ons {
        if product.add_on(selection.add_on.uuid).is_none() {
            return Err(PricingError::UnknownAddOn(
                product.name.clone(),
                selection.add_on.uuid,
            ));
        }

        price = price.add(selection.subtotal()?)?;
    }

    if price.to_minor_units() < 0 {
        return Err(PricingError::NegativePrice(product.name.clone()));
    }

    Ok(price)
}

/// Unit price times quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the multiplication overflows.
pub fn line_total(unit: Price, quantity: u32) -> Result<Price, PricingError> {
    unit.to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(centavos)
        .ok_or(PricingError::Overflow)
}

/// Live preview shown while customising: unit price and unit price times `quantity`.
///
/// # Errors
///
/// See [`unit_price`] and [`line_total`].
pub fn preview(
    product: &Product,
    variation: Option<&Variation>,
    add_ons: &[AddOnSelection],
    quantity: u32,
    now: Timestamp,
) -> Result<(Price, Price), PricingError> {
    let unit = unit_price(product, variation, add_ons, now)?;

    Ok((unit, line_total(unit, quantity)?))
}

/// Sums a list of prices, returning zero for an empty list.
///
/// # Errors
///
/// Returns a [`MoneyError`] on currency mismatch.
pub fn total_price(prices: impl IntoIterator<Item = Price>) -> Result<Price, PricingError> {
    let total = prices
        .into_iter()
        .try_fold(zero(), |acc, price| acc.add(price))?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::{
        discounts::DiscountWindow,
        prices::pesos,
        products::{AddOnUuid, VariationUuid},
    };

    use super::*;

    fn treat(name: &str, price: i64) -> AddOn {
        AddOn {
            uuid: AddOnUuid::new(),
            name: name.to_string(),
            price: pesos(price),
            category: "treats".to_string(),
        }
    }

    fn large() -> Variation {
        Variation {
            uuid: VariationUuid::new(),
            name: "Large".to_string(),
            price_delta: pesos(20),
        }
    }

    #[test]
    fn base_variation_and_add_ons_sum() -> TestResult {
        let mut product = Product::new("Dog Bed", pesos(100));
        let variation = large();
        let chew = treat("Chew", 10);
        let bone = treat("Bone", 5);

        product.variations.push(variation.clone());
        product.add_ons.extend([chew.clone(), bone.clone()]);

        let add_ons = [AddOnSelection::new(chew, 2), AddOnSelection::new(bone, 1)];
        let (unit, total) = preview(&product, Some(&variation), &add_ons, 3, Timestamp::now())?;

        assert_eq!(unit, pesos(145));
        assert_eq!(total, pesos(435));

        Ok(())
    }

    #[test]
    fn active_discount_replaces_base_under_variation() -> TestResult {
        let mut product = Product::new("Dog Bed", pesos(100));
        let variation = large();

        product.variations.push(variation.clone());
        product.discount = DiscountWindow::always(pesos(80));

        let unit = unit_price(&product, Some(&variation), &[], Timestamp::now())?;

        assert_eq!(unit, pesos(100));

        Ok(())
    }

    #[test]
    fn inactive_discount_price_is_ignored() -> TestResult {
        let mut product = Product::new("Dog Bed", pesos(100));

        product.discount = DiscountWindow {
            active: false,
            ..DiscountWindow::always(pesos(50))
        };

        assert_eq!(unit_price(&product, None, &[], Timestamp::now())?, pesos(100));

        Ok(())
    }

    #[test]
    fn discount_outside_window_is_ignored() -> TestResult {
        let now = Timestamp::now();
        let mut product = Product::new("Dog Bed", pesos(100));

        product.discount =
            DiscountWindow::always(pesos(50)).between(Some(now.checked_add(1.hour())?), None);

        assert_eq!(unit_price(&product, None, &[], now)?, pesos(100));

        Ok(())
    }

    #[test]
    fn pricing_is_pure() -> TestResult {
        let mut product = Product::new("Cat Tree", pesos(1_250));
        let chew = treat("Catnip", 15);
        product.add_ons.push(chew.clone());
        product.discount = DiscountWindow::always(pesos(999));

        let snapshot = product.clone();
        let add_ons = [AddOnSelection::new(chew, 3)];
        let now = Timestamp::now();

        let first = unit_price(&product, None, &add_ons, now)?;
        let second = unit_price(&product, None, &add_ons, now)?;

        assert_eq!(first, second);
        assert_eq!(product, snapshot);

        Ok(())
    }

    #[test]
    fn foreign_variation_is_rejected() {
        let product = Product::new("Dog Bed", pesos(100));
        let variation = large();

        let result = unit_price(&product, Some(&variation), &[], Timestamp::now());

        assert!(matches!(result, Err(PricingError::UnknownVariation(_, id)) if id == variation.uuid));
    }

    #[test]
    fn foreign_add_on_is_rejected() {
        let product = Product::new("Dog Bed", pesos(100));
        let add_ons = [AddOnSelection::new(treat("Chew", 10), 1)];

        let result = unit_price(&product, None, &add_ons, Timestamp::now());

        assert!(matches!(result, Err(PricingError::UnknownAddOn(..))));
    }

    #[test]
    fn negative_delta_below_zero_is_rejected() {
        let mut product = Product::new("Sample", pesos(10));
        let variation = Variation {
            uuid: VariationUuid::new(),
            name: "Trial".to_string(),
            price_delta: pesos(-20),
        };
        product.variations.push(variation.clone());

        let result = unit_price(&product, Some(&variation), &[], Timestamp::now());

        assert!(matches!(result, Err(PricingError::NegativePrice(_))));
    }

    #[test]
    fn line_total_overflow_errors() {
        assert_eq!(line_total(centavos(i64::MAX), 2), Err(PricingError::Overflow));
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        assert_eq!(total_price(Vec::<Price>::new())?, zero());

        Ok(())
    }
}
