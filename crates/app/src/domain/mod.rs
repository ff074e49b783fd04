//! Store services
//!
//! One trait per area of the hosted store. [`crate::rest::RestStore`] is the
//! production implementation; tests use the in-memory store or mocks.

pub mod catalog;
pub mod customers;
pub mod errors;
pub mod inventory;
pub mod orders;
pub mod payments;
pub mod reports;

pub use catalog::*;
pub use customers::*;
pub use errors::{RowError, StoreError};
pub use inventory::*;
pub use orders::*;
pub use payments::*;
pub use reports::*;
