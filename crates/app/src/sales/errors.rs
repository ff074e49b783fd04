//! Sale errors.

use petshop::{orders::OrderError, payments::SettlementError};
use thiserror::Error;

use crate::domain::StoreError;

/// Why a sale was refused or stopped. Only [`SaleError::Store`] and
/// [`SaleError::Incomplete`] can leave rows behind; every other variant is
/// raised before anything is written.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer name is required for in-store sales")]
    MissingCustomerName,

    #[error("Sorry, {product} is out of stock.")]
    OutOfStock { product: String },

    #[error("Sorry, only {available} available for {product}, {requested} requested.")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: u64,
    },

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// The store refused the stock read or the order write. When the order
    /// row was inserted but its items were not, that row stays pending.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The order exists but could not be completed.
    #[error("order {order} was created but not completed: {source}")]
    Incomplete {
        order: String,
        #[source]
        source: StoreError,
    },
}
