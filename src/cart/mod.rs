//! Cart
//!
//! The shopper's (or cashier's) working selection. Lines merge by
//! [`LineKey`], keep the unit price they were created with and never exceed
//! known stock for tracked products.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    prices::Price,
    pricing::{AddOnSelection, PricingError, total_price, unit_price},
    products::{Product, ProductUuid, StockLevel, Variation},
};

mod lines;

pub use lines::{CartLine, LineKey, ProductQuantity, normalize_add_ons, product_quantities};

/// Errors rejecting a cart mutation. A rejected mutation leaves the cart unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Quantities start at one.
    #[error("quantity must be at least one")]
    ZeroQuantity,

    /// Staff have switched the product off.
    #[error("{0} is not available")]
    Unavailable(String),

    /// Tracked product with nothing left.
    #[error("Sorry, {product} is out of stock.")]
    OutOfStock {
        /// Product name
        product: String,
    },

    /// The request would put more units in the cart than are on hand.
    #[error(
        "Sorry, only {available} {unit} available for {product}. You already have {in_cart} in your cart.",
        unit = pieces(.available)
    )]
    InsufficientStock {
        /// Product name
        product: String,

        /// Units on hand
        available: i64,

        /// Units already in the cart, on other lines or this one
        in_cart: u64,
    },

    /// No line has this key.
    #[error("cart line {0} not found")]
    LineNotFound(LineKey),

    /// A line quantity would not fit.
    #[error("cart quantity overflowed")]
    QuantityOverflow,

    /// The selection could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl CartError {
    /// For [`CartError::InsufficientStock`], how many more units could still be added.
    pub fn max_additional(&self) -> Option<u64> {
        match self {
            Self::InsufficientStock {
                available, in_cart, ..
            } => Some(u64::try_from(*available).unwrap_or(0).saturating_sub(*in_cart)),
            _ => None,
        }
    }
}

fn pieces(count: &i64) -> &'static str {
    if *count == 1 { "piece" } else { "pieces" }
}

/// Shopping cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product` with the given options.
    ///
    /// An identical selection already in the cart has its quantity increased
    /// and keeps its original unit price. Otherwise a new line is created,
    /// priced at `now`. Returns the key of the affected line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::Unavailable`]: the product is switched off.
    /// - [`CartError::OutOfStock`] / [`CartError::InsufficientStock`]: the
    ///   product is tracked and the request exceeds what is on hand.
    /// - [`CartError::Pricing`]: the selection could not be priced.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        variation: Option<&Variation>,
        add_ons: &[AddOnSelection],
        now: Timestamp,
    ) -> Result<LineKey, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if !product.available {
            return Err(CartError::Unavailable(product.name.clone()));
        }

        let add_ons = normalize_add_ons(add_ons);
        let key = LineKey::new(product.uuid, variation.map(|v| v.uuid), &add_ons);

        if let Some(stock) = product.tracked_stock() {
            self.ensure_stock(product.uuid, &product.name, stock, u64::from(quantity), None)?;
        }

        match self.lines.iter().position(|line| line.key == key) {
            Some(index) => {
                let merged = self
                    .lines
                    .get(index)
                    .and_then(|line| line.quantity.checked_add(quantity))
                    .ok_or(CartError::QuantityOverflow)?;

                self.refresh_stock(product);

                if let Some(line) = self.lines.get_mut(index) {
                    line.quantity = merged;
                }
            }
            None => {
                let line = CartLine {
                    key: key.clone(),
                    name: product.name.clone(),
                    variation: variation.cloned(),
                    unit_price: unit_price(product, variation, &add_ons, now)?,
                    add_ons,
                    quantity,
                    stock: product.stock,
                };

                self.refresh_stock(product);
                self.lines.push(line);
            }
        }

        Ok(key)
    }

    /// Every line of `product` takes its latest stock level, so later
    /// increases on any of them are checked against the same figure.
    fn refresh_stock(&mut self, product: &Product) {
        self.lines
            .iter_mut()
            .filter(|line| line.product() == product.uuid)
            .for_each(|line| line.stock = product.stock);
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// Increases are checked against the latest stock seen for the product
    /// across all of its lines; decreases always succeed.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line has `key`.
    /// - [`CartError::OutOfStock`] / [`CartError::InsufficientStock`]: the
    ///   increase exceeds what is on hand.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| CartError::LineNotFound(key.clone()));
        }

        let line = self
            .get(key)
            .ok_or_else(|| CartError::LineNotFound(key.clone()))?;

        if quantity > line.quantity
            && let Some(stock) = line.stock.filter(|stock| stock.tracked)
        {
            let name = line.name.clone();
            self.ensure_stock(key.product(), &name, &stock, u64::from(quantity), Some(key))?;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| &line.key == key) {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Removes a line, returning it.
    pub fn remove(&mut self, key: &LineKey) -> Option<CartLine> {
        let position = self.lines.iter().position(|line| &line.key == key)?;

        Some(self.lines.remove(position))
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any line total overflows.
    pub fn total_price(&self) -> Result<Price, PricingError> {
        let totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<Vec<_>, _>>()?;

        total_price(totals)
    }

    /// Sum of line quantities.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Units of `product` across all lines.
    pub fn quantity_of(&self, product: ProductUuid) -> u64 {
        self.quantity_excluding(product, None)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Finds a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn quantity_excluding(&self, product: ProductUuid, exclude: Option<&LineKey>) -> u64 {
        self.lines
            .iter()
            .filter(|line| line.product() == product)
            .filter(|line| exclude.is_none_or(|key| &line.key != key))
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Checks that `requested` more units of `product`, on top of every line
    /// except `exclude`, fit within `stock`.
    fn ensure_stock(
        &self,
        product: ProductUuid,
        name: &str,
        stock: &StockLevel,
        requested: u64,
        exclude: Option<&LineKey>,
    ) -> Result<(), CartError> {
        if stock.is_out() {
            return Err(CartError::OutOfStock {
                product: name.to_string(),
            });
        }

        let in_cart = self.quantity_excluding(product, exclude);
        let available = u64::try_from(stock.current).unwrap_or(0);

        if in_cart.saturating_add(requested) > available {
            return Err(CartError::InsufficientStock {
                product: name.to_string(),
                available: stock.current,
                in_cart,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        discounts::DiscountWindow,
        prices::pesos,
        products::{AddOn, AddOnUuid, VariationUuid},
    };

    use super::*;

    fn kibble(stock: i64) -> Product {
        Product::new("Kibble", pesos(100)).with_stock(StockLevel::tracked(stock))
    }

    fn size(name: &str, delta: i64) -> Variation {
        Variation {
            uuid: VariationUuid::new(),
            name: name.to_string(),
            price_delta: pesos(delta),
        }
    }

    #[test]
    fn add_creates_line_with_unit_price() -> TestResult {
        let product = kibble(10);
        let mut cart = Cart::new();

        let key = cart.add(&product, 2, None, &[], Timestamp::now())?;
        let line = cart.get(&key).ok_or("missing line")?;

        assert_eq!(line.quantity(), 2);
        assert_eq!(line.unit_price(), pesos(100));
        assert_eq!(cart.total_price()?, pesos(200));
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn identical_selection_merges() -> TestResult {
        let product = kibble(10);
        let mut cart = Cart::new();

        let first = cart.add(&product, 1, None, &[], Timestamp::now())?;
        let second = cart.add(&product, 2, None, &[], Timestamp::now())?;

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(product.uuid), 3);

        Ok(())
    }

    #[test]
    fn different_variations_are_separate_lines() -> TestResult {
        let mut product = kibble(10);
        let small = size("1kg", 0);
        let large = size("5kg", 300);
        product.variations.extend([small.clone(), large.clone()]);

        let mut cart = Cart::new();
        cart.add(&product, 1, Some(&small), &[], Timestamp::now())?;
        cart.add(&product, 1, Some(&large), &[], Timestamp::now())?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_price()?, pesos(500));

        Ok(())
    }

    #[test]
    fn merged_line_keeps_original_unit_price() -> TestResult {
        let mut product = kibble(10);
        product.discount = DiscountWindow::always(pesos(80));

        let mut cart = Cart::new();
        let key = cart.add(&product, 1, None, &[], Timestamp::now())?;

        product.discount = DiscountWindow::none();
        cart.add(&product, 1, None, &[], Timestamp::now())?;

        let line = cart.get(&key).ok_or("missing line")?;
        assert_eq!(line.unit_price(), pesos(80));
        assert_eq!(line.total()?, pesos(160));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.add(&kibble(5), 0, None, &[], Timestamp::now()),
            Err(CartError::ZeroQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn unavailable_product_is_rejected() {
        let mut product = kibble(5);
        product.available = false;
        let mut cart = Cart::new();

        assert_eq!(
            cart.add(&product, 1, None, &[], Timestamp::now()),
            Err(CartError::Unavailable("Kibble".to_string()))
        );
    }

    #[test]
    fn out_of_stock_is_rejected() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.add(&kibble(0), 1, None, &[], Timestamp::now()),
            Err(CartError::OutOfStock {
                product: "Kibble".to_string()
            })
        );
    }

    #[test]
    fn stock_ceiling_counts_every_line_of_the_product() -> TestResult {
        let mut product = kibble(3);
        let small = size("1kg", 0);
        let large = size("5kg", 300);
        product.variations.extend([small.clone(), large.clone()]);

        let mut cart = Cart::new();
        cart.add(&product, 2, Some(&small), &[], Timestamp::now())?;

        let result = cart.add(&product, 2, Some(&large), &[], Timestamp::now());

        assert_eq!(
            result,
            Err(CartError::InsufficientStock {
                product: "Kibble".to_string(),
                available: 3,
                in_cart: 2,
            })
        );
        assert_eq!(result.err().and_then(|e| e.max_additional()), Some(1));
        assert_eq!(cart.len(), 1);

        cart.add(&product, 1, Some(&large), &[], Timestamp::now())?;
        assert_eq!(cart.quantity_of(product.uuid), 3);

        Ok(())
    }

    #[test]
    fn insufficient_stock_message_mentions_cart() {
        let error = CartError::InsufficientStock {
            product: "Kibble".to_string(),
            available: 1,
            in_cart: 1,
        };

        assert_eq!(
            error.to_string(),
            "Sorry, only 1 piece available for Kibble. You already have 1 in your cart."
        );
    }

    #[test]
    fn untracked_product_has_no_ceiling() -> TestResult {
        let product = Product::new("Grooming", pesos(350));
        let mut cart = Cart::new();

        cart.add(&product, 500, None, &[], Timestamp::now())?;

        assert_eq!(cart.total_items(), 500);

        Ok(())
    }

    #[test]
    fn update_quantity_checks_increase_against_other_lines() -> TestResult {
        let mut product = kibble(4);
        let small = size("1kg", 0);
        let large = size("5kg", 300);
        product.variations.extend([small.clone(), large.clone()]);

        let mut cart = Cart::new();
        let key = cart.add(&product, 1, Some(&small), &[], Timestamp::now())?;
        cart.add(&product, 1, Some(&large), &[], Timestamp::now())?;

        cart.update_quantity(&key, 3)?;
        assert_eq!(cart.quantity_of(product.uuid), 4);

        let result = cart.update_quantity(&key, 4);
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock { in_cart: 1, .. })
        ));
        assert_eq!(cart.get(&key).map(CartLine::quantity), Some(3));

        Ok(())
    }

    #[test]
    fn lower_stock_seen_on_add_caps_every_line() -> TestResult {
        let mut product = kibble(10);
        let small = size("1kg", 0);
        let large = size("5kg", 300);
        product.variations.extend([small.clone(), large.clone()]);

        let mut cart = Cart::new();
        let key = cart.add(&product, 1, Some(&small), &[], Timestamp::now())?;

        product.stock = Some(StockLevel::tracked(2));
        cart.add(&product, 1, Some(&large), &[], Timestamp::now())?;

        let result = cart.update_quantity(&key, 5);

        assert_eq!(
            result,
            Err(CartError::InsufficientStock {
                product: "Kibble".to_string(),
                available: 2,
                in_cart: 1,
            })
        );
        assert_eq!(cart.quantity_of(product.uuid), 2);
        assert_eq!(cart.get(&key).and_then(CartLine::stock).map(|s| s.current), Some(2));

        Ok(())
    }

    #[test]
    fn rejected_add_leaves_stock_snapshots_alone() -> TestResult {
        let mut product = kibble(10);
        let mut cart = Cart::new();
        let key = cart.add(&product, 4, None, &[], Timestamp::now())?;

        product.stock = Some(StockLevel::tracked(3));

        assert!(cart.add(&product, 1, None, &[], Timestamp::now()).is_err());
        assert_eq!(cart.get(&key).and_then(CartLine::stock).map(|s| s.current), Some(10));
        assert_eq!(cart.quantity_of(product.uuid), 4);

        Ok(())
    }

    #[test]
    fn update_quantity_decrease_always_succeeds() -> TestResult {
        let mut product = kibble(5);
        let mut cart = Cart::new();
        let key = cart.add(&product, 5, None, &[], Timestamp::now())?;

        product.stock = Some(StockLevel::tracked(0));
        cart.update_quantity(&key, 2)?;

        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn update_to_zero_removes_line() -> TestResult {
        let mut cart = Cart::new();
        let key = cart.add(&kibble(5), 2, None, &[], Timestamp::now())?;

        cart.update_quantity(&key, 0)?;

        assert!(cart.is_empty());
        assert_eq!(
            cart.update_quantity(&key, 1),
            Err(CartError::LineNotFound(key))
        );

        Ok(())
    }

    #[test]
    fn add_ons_in_any_order_merge() -> TestResult {
        let chew = AddOn {
            uuid: AddOnUuid::new(),
            name: "Chew".to_string(),
            price: pesos(10),
            category: String::new(),
        };
        let bone = AddOn {
            uuid: AddOnUuid::new(),
            name: "Bone".to_string(),
            price: pesos(5),
            category: String::new(),
        };

        let mut product = kibble(10);
        product.add_ons.extend([chew.clone(), bone.clone()]);

        let mut cart = Cart::new();
        cart.add(
            &product,
            1,
            None,
            &[
                AddOnSelection::new(chew.clone(), 1),
                AddOnSelection::new(bone.clone(), 1),
            ],
            Timestamp::now(),
        )?;
        cart.add(
            &product,
            1,
            None,
            &[AddOnSelection::new(bone, 1), AddOnSelection::new(chew, 1)],
            Timestamp::now(),
        )?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_price()?, pesos(230));

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::new();
        cart.add(&kibble(5), 2, None, &[], Timestamp::now())?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);

        Ok(())
    }
}
