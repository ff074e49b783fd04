//! Petshop
//!
//! Catalog pricing, cart aggregation and order building for a pet-supply storefront
//! and its point of sale. Everything here is synchronous and free of I/O; the
//! `petshop-app` crate talks to the backend.

pub mod cart;
pub mod checkout;
pub mod customers;
pub mod discounts;
pub mod fixtures;
pub mod inventory;
pub mod numbers;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod uuids;
