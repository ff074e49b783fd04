//! Cart Lines

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    prices::Price,
    pricing::{AddOnSelection, PricingError, line_total},
    products::{AddOnUuid, ProductUuid, StockLevel, Variation, VariationUuid},
};

/// Identity of a cart line: product, variation and the normalized add-on multiset.
///
/// Two selections with the same key are the same line and merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    product: ProductUuid,
    variation: Option<VariationUuid>,
    add_ons: SmallVec<[(AddOnUuid, u32); 4]>,
}

impl LineKey {
    /// Builds a key from already-normalized add-ons.
    pub(crate) fn new(
        product: ProductUuid,
        variation: Option<VariationUuid>,
        add_ons: &[AddOnSelection],
    ) -> Self {
        Self {
            product,
            variation,
            add_ons: add_ons
                .iter()
                .map(|selection| (selection.add_on.uuid, selection.quantity))
                .collect(),
        }
    }

    /// The product this line sells.
    pub fn product(&self) -> ProductUuid {
        self.product
    }

    /// The selected variation, if any.
    pub fn variation(&self) -> Option<VariationUuid> {
        self.variation
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-", self.product)?;

        match self.variation {
            Some(variation) => write!(f, "{variation}-")?,
            None => f.write_str("default-")?,
        }

        if self.add_ons.is_empty() {
            return f.write_str("none");
        }

        for (i, (add_on, quantity)) in self.add_ons.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }

            write!(f, "{add_on}:{quantity}")?;
        }

        Ok(())
    }
}

/// Groups repeated add-on selections into one entry per add-on with summed
/// quantities, drops empty selections and sorts by add-on id, so selection
/// order never affects line identity.
pub fn normalize_add_ons(add_ons: &[AddOnSelection]) -> Vec<AddOnSelection> {
    let mut grouped: FxHashMap<AddOnUuid, AddOnSelection> = FxHashMap::default();

    for selection in add_ons.iter().filter(|selection| selection.quantity > 0) {
        grouped
            .entry(selection.add_on.uuid)
            .and_modify(|existing| {
                existing.quantity = existing.quantity.saturating_add(selection.quantity);
            })
            .or_insert_with(|| selection.clone());
    }

    let mut normalized: Vec<AddOnSelection> = grouped.into_values().collect();
    normalized.sort_by_key(|selection| selection.add_on.uuid);
    normalized
}

/// One distinct purchasable selection held in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub(crate) key: LineKey,
    pub(crate) name: String,
    pub(crate) variation: Option<Variation>,
    pub(crate) add_ons: Vec<AddOnSelection>,
    pub(crate) quantity: u32,
    pub(crate) unit_price: Price,
    pub(crate) stock: Option<StockLevel>,
}

impl CartLine {
    /// Line identity.
    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// The product sold on this line.
    pub fn product(&self) -> ProductUuid {
        self.key.product
    }

    /// Product name at the time the line was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selected variation.
    pub fn variation(&self) -> Option<&Variation> {
        self.variation.as_ref()
    }

    /// Selected add-ons, normalized.
    pub fn add_ons(&self) -> &[AddOnSelection] {
        &self.add_ons
    }

    /// Units on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price frozen when the line was created.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Stock level last seen for the product.
    pub fn stock(&self) -> Option<&StockLevel> {
        self.stock.as_ref()
    }

    /// Whether the product is stock-tracked.
    pub fn is_tracked(&self) -> bool {
        self.stock.is_some_and(|stock| stock.tracked)
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the multiplication overflows.
    pub fn total(&self) -> Result<Price, PricingError> {
        line_total(self.unit_price, self.quantity)
    }

    /// Short description, e.g. `"Dog Food (5kg) + Treat x2, Bowl"`.
    pub fn describe(&self) -> String {
        let mut description = self.name.clone();

        if let Some(variation) = &self.variation {
            description.push_str(&format!(" ({})", variation.name));
        }

        if !self.add_ons.is_empty() {
            let add_ons: Vec<String> = self
                .add_ons
                .iter()
                .map(|selection| {
                    if selection.quantity > 1 {
                        format!("{} x{}", selection.add_on.name, selection.quantity)
                    } else {
                        selection.add_on.name.clone()
                    }
                })
                .collect();

            description.push_str(" + ");
            description.push_str(&add_ons.join(", "));
        }

        description
    }
}

/// Units of one product across every line that sells it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuantity {
    /// Product id
    pub product: ProductUuid,

    /// Product name
    pub name: String,

    /// Units across all lines
    pub quantity: u64,
}

/// Sums quantities per product over `lines`, in first-seen order.
pub fn product_quantities(lines: &[CartLine]) -> Vec<ProductQuantity> {
    let mut index: FxHashMap<ProductUuid, usize> = FxHashMap::default();
    let mut totals: Vec<ProductQuantity> = Vec::new();

    for line in lines {
        let product = line.product();

        if let Some(total) = index.get(&product).and_then(|i| totals.get_mut(*i)) {
            total.quantity += u64::from(line.quantity);
            continue;
        }

        index.insert(product, totals.len());
        totals.push(ProductQuantity {
            product,
            name: line.name.clone(),
            quantity: u64::from(line.quantity),
        });
    }

    totals
}

#[cfg(test)]
mod tests {
    use crate::{prices::pesos, products::AddOn};

    use super::*;

    fn add_on(name: &str) -> AddOn {
        AddOn {
            uuid: AddOnUuid::new(),
            name: name.to_string(),
            price: pesos(5),
            category: String::new(),
        }
    }

    #[test]
    fn normalize_groups_and_sorts() {
        let chew = add_on("Chew");
        let bone = add_on("Bone");

        let normalized = normalize_add_ons(&[
            AddOnSelection::new(chew.clone(), 1),
            AddOnSelection::new(bone.clone(), 1),
            AddOnSelection::new(chew.clone(), 2),
            AddOnSelection::new(bone.clone(), 0),
        ]);

        let mut expected = vec![
            AddOnSelection::new(chew, 3),
            AddOnSelection::new(bone, 1),
        ];
        expected.sort_by_key(|selection| selection.add_on.uuid);

        assert_eq!(normalized, expected);
    }

    #[test]
    fn selection_order_does_not_change_key() {
        let product = ProductUuid::new();
        let chew = add_on("Chew");
        let bone = add_on("Bone");

        let a = normalize_add_ons(&[
            AddOnSelection::new(chew.clone(), 1),
            AddOnSelection::new(bone.clone(), 1),
        ]);
        let b = normalize_add_ons(&[AddOnSelection::new(bone, 1), AddOnSelection::new(chew, 1)]);

        assert_eq!(LineKey::new(product, None, &a), LineKey::new(product, None, &b));
    }

    #[test]
    fn key_displays_default_and_none() {
        let product = ProductUuid::new();
        let key = LineKey::new(product, None, &[]);

        assert_eq!(key.to_string(), format!("{product}-default-none"));
    }

    #[test]
    fn key_displays_add_on_quantities() {
        let product = ProductUuid::new();
        let variation = VariationUuid::new();
        let chew = add_on("Chew");
        let chew_id = chew.uuid;

        let key = LineKey::new(product, Some(variation), &[AddOnSelection::new(chew, 2)]);

        assert_eq!(key.to_string(), format!("{product}-{variation}-{chew_id}:2"));
    }
}
