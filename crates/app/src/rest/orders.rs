//! Orders over PostgREST.

use async_trait::async_trait;
use jiff::Timestamp;
use petshop::{
    orders::{Order, OrderDraft, OrderStatus, OrderUuid, PaymentStatus},
    prices::{self, Price},
};
use serde::de::IgnoredAny;
use tracing::instrument;

use crate::{
    domain::{OrdersService, StoreError},
    rest::{
        RestStore, eq,
        rows::{CompleteOrderPatch, MarkPaidPatch, NewOrderRow, OrderItemRow, OrderRow},
        single,
    },
};

const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";

#[async_trait]
impl OrdersService for RestStore {
    #[instrument(skip(self, draft), fields(number = %draft.number, lines = draft.lines.len()))]
    async fn create_order(&self, draft: &OrderDraft, now: Timestamp) -> Result<Order, StoreError> {
        let rows: Vec<OrderRow> = self
            .insert(ORDERS, &[NewOrderRow::new(draft, now)])
            .await?;

        let order = Order::try_from(single(rows, "order")?)?;

        let items = draft
            .lines
            .iter()
            .map(|line| OrderItemRow::new(order.uuid, line))
            .collect::<Vec<_>>();

        let _inserted: Vec<IgnoredAny> = self.insert(ORDER_ITEMS, &items).await?;

        Ok(order)
    }

    #[instrument(skip(self))]
    async fn complete_order(
        &self,
        order: OrderUuid,
        payment_status: PaymentStatus,
        now: Timestamp,
    ) -> Result<Order, StoreError> {
        let patch = CompleteOrderPatch {
            payment_status,
            order_status: OrderStatus::Completed,
            paid_at: (payment_status == PaymentStatus::Paid).then_some(now),
            completed_at: now,
        };

        let rows: Vec<OrderRow> = self.update(ORDERS, &[("id", eq(order))], &patch).await?;

        Ok(Order::try_from(single(rows, "order")?)?)
    }

    #[instrument(skip(self))]
    async fn mark_paid(
        &self,
        order: OrderUuid,
        paid_amount: Price,
        now: Timestamp,
    ) -> Result<Order, StoreError> {
        let patch = MarkPaidPatch {
            payment_status: PaymentStatus::Paid,
            paid_at: now,
            paid_amount: prices::to_decimal(paid_amount),
        };

        let rows: Vec<OrderRow> = self.update(ORDERS, &[("id", eq(order))], &patch).await?;

        Ok(Order::try_from(single(rows, "order")?)?)
    }

    #[instrument(skip(self))]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, StoreError> {
        let rows: Vec<OrderRow> = self.select(ORDERS, "*", &[("id", eq(order))]).await?;

        Ok(Order::try_from(single(rows, "order")?)?)
    }

    #[instrument(skip(self))]
    async fn list_pending_payments(&self) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<OrderRow> = self
            .select(
                ORDERS,
                "*",
                &[
                    ("payment_status", "in.(pending,partial)".to_string()),
                    ("order_status", eq("completed")),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
