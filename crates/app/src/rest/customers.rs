//! Customers over PostgREST.

use async_trait::async_trait;
use petshop::customers::{Customer, NewCustomer};
use tracing::instrument;

use crate::{
    domain::{CustomersService, StoreError},
    rest::{
        RestStore, eq,
        rows::{CustomerRow, NewCustomerRow},
        single,
    },
};

const CUSTOMERS: &str = "customers";

fn into_customers(rows: Vec<CustomerRow>) -> Result<Vec<Customer>, StoreError> {
    Ok(rows
        .into_iter()
        .map(Customer::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl CustomersService for RestStore {
    #[instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = self
            .select(
                CUSTOMERS,
                "*",
                &[
                    ("is_active", eq(true)),
                    ("order", "created_at.desc".to_string()),
                    ("limit", "100".to_string()),
                ],
            )
            .await?;

        into_customers(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_phone(&self, fragment: &str) -> Result<Vec<Customer>, StoreError> {
        let rows = self
            .select(
                CUSTOMERS,
                "*",
                &[
                    ("phone", format!("ilike.*{}*", fragment.trim())),
                    ("is_active", eq(true)),
                    ("limit", "10".to_string()),
                ],
            )
            .await?;

        into_customers(rows)
    }

    #[instrument(skip(self, customer), fields(code = %customer.code))]
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let rows: Vec<CustomerRow> = self
            .insert(CUSTOMERS, &[NewCustomerRow::from(customer)])
            .await?;

        Ok(Customer::try_from(single(rows, "customer")?)?)
    }
}
