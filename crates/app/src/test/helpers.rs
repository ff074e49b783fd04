//! Test Helpers

use jiff::Timestamp;
use petshop::{
    cart::{Cart, CartError},
    inventory::{InventoryDefaults, InventoryRecord},
    prices::{Price, pesos},
    products::{Product, StockLevel},
};

use super::store::MemoryStore;

/// A fixed instant for deterministic numbers and flags.
pub(crate) fn now() -> Timestamp {
    Timestamp::from_second(1_760_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
}

/// A tracked product with `stock` on hand, registered in `store` along with
/// its inventory record.
pub(crate) fn stocked_product(store: &MemoryStore, name: &str, price: Price, stock: i64) -> Product {
    let product = Product::new(name, price).with_stock(StockLevel::tracked(stock));
    let record = InventoryRecord::new(product.uuid, InventoryDefaults::default(), pesos(40))
        .with_stock(stock, now());

    store.add_product(product.clone());
    store.add_record(record);

    product
}

/// A product without an inventory record.
pub(crate) fn untracked_product(store: &MemoryStore, name: &str, price: Price) -> Product {
    let product = Product::new(name, price);

    store.add_product(product.clone());

    product
}

pub(crate) fn cart_of(items: &[(&Product, u32)]) -> Result<Cart, CartError> {
    let mut cart = Cart::new();

    for (product, quantity) in items {
        cart.add(product, *quantity, None, &[], now())?;
    }

    Ok(cart)
}
