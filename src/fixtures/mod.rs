//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    fixtures::catalog::CatalogFixture,
    pricing::AddOnSelection,
    products::{Product, Variation},
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid timestamp format
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variation not found
    #[error("Variation {1} not found on {0}")]
    VariationNotFound(String, String),

    /// Add-on not found
    #[error("Add-on {1} not found on {0}")]
    AddOnNotFound(String, String),
}

/// A catalog loaded from YAML, keyed by the fixture's product keys.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Product key -> product
    products: FxHashMap<String, Product>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
        }
    }

    /// Load products from `catalog/{name}.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_catalog_str(&contents)
    }

    /// Load products from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed.
    pub fn load_catalog_str(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        for (key, product_fixture) in fixture.products {
            let product = Product::try_from(product_fixture)?;

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load a named catalog from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a mutable product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_mut(&mut self, key: &str) -> Result<&mut Product, FixtureError> {
        self.products
            .get_mut(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product's variation by name
    ///
    /// # Errors
    ///
    /// Returns an error if the product or variation is not found.
    pub fn variation(&self, key: &str, name: &str) -> Result<&Variation, FixtureError> {
        self.product(key)?
            .variations
            .iter()
            .find(|variation| variation.name == name)
            .ok_or_else(|| FixtureError::VariationNotFound(key.to_string(), name.to_string()))
    }

    /// Select `quantity` of a product's add-on by name
    ///
    /// # Errors
    ///
    /// Returns an error if the product or add-on is not found.
    pub fn add_on(&self, key: &str, name: &str, quantity: u32) -> Result<AddOnSelection, FixtureError> {
        self.product(key)?
            .add_ons
            .iter()
            .find(|add_on| add_on.name == name)
            .map(|add_on| AddOnSelection::new(add_on.clone(), quantity))
            .ok_or_else(|| FixtureError::AddOnNotFound(key.to_string(), name.to_string()))
    }

    /// All products, in no particular order
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products loaded
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether no products are loaded
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
