//! Customers

use jiff::Timestamp;
use thiserror::Error;

use crate::{numbers::customer_code, prices::Price, uuids::TypedUuid};

/// Customer Id
pub type CustomerUuid = TypedUuid<Customer>;

/// A registered customer and the pet they shop for.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Customer id
    pub uuid: CustomerUuid,

    /// Code printed on receipts, `CUST-NNNNNN`
    pub code: String,

    /// Name
    pub name: String,

    /// Phone
    pub phone: String,

    /// Email
    pub email: Option<String>,

    /// Address
    pub address: Option<String>,

    /// Pet details
    pub pet: PetProfile,

    /// Lifetime order count
    pub total_orders: u32,

    /// Lifetime spend
    pub total_spent: Price,

    /// Loyalty balance
    pub loyalty_points: u32,

    /// Registered at
    pub created_at: Option<Timestamp>,
}

/// The customer's pet, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetProfile {
    /// Pet name
    pub name: Option<String>,

    /// Dog, cat, ...
    pub kind: Option<String>,

    /// Breed
    pub breed: Option<String>,

    /// Age in years
    pub age: Option<u8>,
}

/// Errors validating a new customer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// Name left blank.
    #[error("customer name is required")]
    MissingName,

    /// Phone left blank.
    #[error("customer phone is required")]
    MissingPhone,
}

/// A customer about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Generated code
    pub code: String,

    /// Name
    pub name: String,

    /// Phone
    pub phone: String,

    /// Email
    pub email: Option<String>,

    /// Address
    pub address: Option<String>,

    /// Pet details
    pub pet: PetProfile,
}

impl NewCustomer {
    /// Validates the details and assigns a code from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError`] when the name or phone is blank.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, CustomerError> {
        let name = name.into().trim().to_string();
        let phone = phone.into().trim().to_string();

        if name.is_empty() {
            return Err(CustomerError::MissingName);
        }

        if phone.is_empty() {
            return Err(CustomerError::MissingPhone);
        }

        Ok(Self {
            code: customer_code(now),
            name,
            phone,
            email: None,
            address: None,
            pet: PetProfile::default(),
        })
    }

    /// Sets the pet details and returns the customer.
    #[must_use]
    pub fn with_pet(mut self, pet: PetProfile) -> Self {
        self.pet = pet;
        self
    }
}
