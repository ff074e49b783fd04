//! Customers service.

use async_trait::async_trait;
use mockall::automock;
use petshop::customers::{Customer, NewCustomer};

use crate::domain::StoreError;

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Active customers, newest first, at most 100.
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Active customers whose phone contains `fragment`, at most 10.
    async fn find_by_phone(&self, fragment: &str) -> Result<Vec<Customer>, StoreError>;

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError>;
}
