//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use petshop::{
    orders::{Order, OrderDraft, OrderUuid, PaymentStatus},
    prices::Price,
};

use crate::domain::StoreError;

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Inserts the order as pending/pending, then its lines.
    async fn create_order(&self, draft: &OrderDraft, now: Timestamp) -> Result<Order, StoreError>;

    /// Marks the order completed with the given payment status. Completion is
    /// what fires the store's stock decrement.
    async fn complete_order(
        &self,
        order: OrderUuid,
        payment_status: PaymentStatus,
        now: Timestamp,
    ) -> Result<Order, StoreError>;

    /// Records a settled balance on an order.
    async fn mark_paid(
        &self,
        order: OrderUuid,
        paid_amount: Price,
        now: Timestamp,
    ) -> Result<Order, StoreError>;

    async fn get_order(&self, order: OrderUuid) -> Result<Order, StoreError>;

    /// Completed orders still waiting for payment, newest first.
    async fn list_pending_payments(&self) -> Result<Vec<Order>, StoreError>;
}
