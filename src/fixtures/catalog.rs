//! Catalog Fixtures

use std::str::FromStr;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    discounts::DiscountWindow,
    fixtures::FixtureError,
    prices::{self, Price},
    products::{AddOn, AddOnUuid, Product, ProductUuid, StockLevel, Variation, VariationUuid},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Display name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Category slug
    #[serde(default)]
    pub category: String,

    /// Price in pesos, e.g. "145.00"
    pub price: String,

    /// Discount window
    #[serde(default)]
    pub discount: Option<DiscountFixture>,

    /// Purchasable flag
    #[serde(default = "default_available")]
    pub available: bool,

    /// Popular flag
    #[serde(default)]
    pub popular: bool,

    /// Tracked stock; untracked when absent
    #[serde(default)]
    pub stock: Option<i64>,

    /// Variation name -> price delta
    #[serde(default)]
    pub variations: Vec<VariationFixture>,

    /// Add-ons offered
    #[serde(default)]
    pub add_ons: Vec<AddOnFixture>,
}

fn default_available() -> bool {
    true
}

/// Discount fixture from YAML
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Discount price in pesos
    pub price: String,

    /// Master switch
    #[serde(default = "default_available")]
    pub active: bool,

    /// RFC 3339 start
    #[serde(default)]
    pub starts_at: Option<String>,

    /// RFC 3339 end
    #[serde(default)]
    pub ends_at: Option<String>,
}

/// Variation fixture from YAML
#[derive(Debug, Deserialize)]
pub struct VariationFixture {
    /// Display name, also the lookup key
    pub name: String,

    /// Delta in pesos, may be negative
    #[serde(default = "zero_delta")]
    pub delta: String,
}

fn zero_delta() -> String {
    "0".to_string()
}

/// Add-on fixture from YAML
#[derive(Debug, Deserialize)]
pub struct AddOnFixture {
    /// Display name, also the lookup key
    pub name: String,

    /// Price in pesos
    pub price: String,

    /// Grouping
    #[serde(default)]
    pub category: String,
}

/// Parse a peso amount such as `"145.00"`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] when the amount is not a decimal.
pub fn parse_price(s: &str) -> Result<Price, FixtureError> {
    let amount = Decimal::from_str(s.trim()).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    prices::from_decimal(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

fn parse_timestamp(s: Option<&str>) -> Result<Option<Timestamp>, FixtureError> {
    s.map(|s| {
        s.parse::<Timestamp>()
            .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
    })
    .transpose()
}

impl TryFrom<DiscountFixture> for DiscountWindow {
    type Error = FixtureError;

    fn try_from(fixture: DiscountFixture) -> Result<Self, Self::Error> {
        Ok(DiscountWindow {
            price: Some(parse_price(&fixture.price)?),
            active: fixture.active,
            starts_at: parse_timestamp(fixture.starts_at.as_deref())?,
            ends_at: parse_timestamp(fixture.ends_at.as_deref())?,
        })
    }
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let variations = fixture
            .variations
            .into_iter()
            .map(|variation| -> Result<Variation, FixtureError> {
                Ok(Variation {
                    uuid: VariationUuid::new(),
                    price_delta: parse_price(&variation.delta)?,
                    name: variation.name,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let add_ons = fixture
            .add_ons
            .into_iter()
            .map(|add_on| -> Result<AddOn, FixtureError> {
                Ok(AddOn {
                    uuid: AddOnUuid::new(),
                    price: parse_price(&add_on.price)?,
                    name: add_on.name,
                    category: add_on.category,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Product {
            uuid: ProductUuid::new(),
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            base_price: parse_price(&fixture.price)?,
            discount: fixture
                .discount
                .map(DiscountWindow::try_from)
                .transpose()?
                .unwrap_or_default(),
            available: fixture.available,
            popular: fixture.popular,
            variations,
            add_ons,
            stock: fixture.stock.map(StockLevel::tracked),
        })
    }
}
