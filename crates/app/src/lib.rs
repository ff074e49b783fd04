//! Point-of-sale services for the petshop storefront.

pub mod config;
pub mod context;
pub mod domain;
pub mod maintenance;
pub mod observability;
pub mod pending;
pub mod rest;
pub mod sales;
pub mod session;

#[cfg(test)]
mod test;
