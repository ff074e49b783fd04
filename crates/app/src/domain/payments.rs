//! Payments service.

use async_trait::async_trait;
use mockall::automock;
use petshop::{
    orders::OrderUuid,
    payments::{NewPayment, Payment},
};

use crate::domain::StoreError;

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Records a completed payment against an order.
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, StoreError>;

    async fn list_payments(&self, order: OrderUuid) -> Result<Vec<Payment>, StoreError>;
}
