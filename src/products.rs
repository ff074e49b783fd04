//! Products

use crate::{discounts::DiscountWindow, prices::Price, uuids::TypedUuid};

/// Product Id
pub type ProductUuid = TypedUuid<Product>;

/// Variation Id
pub type VariationUuid = TypedUuid<Variation>;

/// Add-on Id
pub type AddOnUuid = TypedUuid<AddOn>;

/// A catalog product as seen by the storefront and the POS.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub uuid: ProductUuid,

    /// Display name
    pub name: String,

    /// Long description, may be empty
    pub description: String,

    /// Category slug
    pub category: String,

    /// Regular price
    pub base_price: Price,

    /// Optional discount and the window it runs in
    pub discount: DiscountWindow,

    /// Whether staff have marked the product as purchasable
    pub available: bool,

    /// Shown in the popular section of the storefront
    pub popular: bool,

    /// Size/flavour variations, each adjusting the price
    pub variations: Vec<Variation>,

    /// Optional extras a shopper can attach with their own quantity
    pub add_ons: Vec<AddOn>,

    /// Stock tracking, absent when the product has no inventory record
    pub stock: Option<StockLevel>,
}

impl Product {
    /// Creates an untracked, available product with no options.
    #[must_use]
    pub fn new(name: impl Into<String>, base_price: Price) -> Self {
        Self {
            uuid: ProductUuid::new(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            base_price,
            discount: DiscountWindow::none(),
            available: true,
            popular: false,
            variations: Vec::new(),
            add_ons: Vec::new(),
            stock: None,
        }
    }

    /// Sets the stock level and returns the product.
    #[must_use]
    pub fn with_stock(mut self, stock: StockLevel) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Finds one of this product's variations.
    pub fn variation(&self, uuid: VariationUuid) -> Option<&Variation> {
        self.variations.iter().find(|v| v.uuid == uuid)
    }

    /// Finds one of this product's add-ons.
    pub fn add_on(&self, uuid: AddOnUuid) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.uuid == uuid)
    }

    /// The stock level when the product is tracked.
    pub fn tracked_stock(&self) -> Option<&StockLevel> {
        self.stock.as_ref().filter(|stock| stock.tracked)
    }

    /// Whether the product can be put in a cart right now.
    ///
    /// A tracked product that has run out is unavailable regardless of its flag.
    pub fn is_available(&self) -> bool {
        self.available && !self.tracked_stock().is_some_and(StockLevel::is_out)
    }
}

/// A product variation with a price delta relative to the product's base.
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    /// Variation id
    pub uuid: VariationUuid,

    /// Display name, e.g. "5kg"
    pub name: String,

    /// Amount added to the (discount-aware) base price, may be negative
    pub price_delta: Price,
}

/// An add-on that can be attached to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOn {
    /// Add-on id
    pub uuid: AddOnUuid,

    /// Display name
    pub name: String,

    /// Price per unit of the add-on
    pub price: Price,

    /// Grouping shown in the customisation dialog
    pub category: String,
}

/// Stock figures attached to a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    /// Units on hand
    pub current: i64,

    /// Whether sales are checked against and decrement this stock
    pub tracked: bool,

    /// Out-of-stock flag as last written by the backend
    pub out_of_stock: bool,
}

impl StockLevel {
    /// A tracked stock level.
    #[must_use]
    pub fn tracked(current: i64) -> Self {
        Self {
            current,
            tracked: true,
            out_of_stock: current <= 0,
        }
    }

    /// Whether no unit can be sold.
    pub fn is_out(&self) -> bool {
        self.out_of_stock || self.current <= 0
    }
}
