//! Payments over PostgREST.

use async_trait::async_trait;
use petshop::{
    orders::OrderUuid,
    payments::{NewPayment, Payment},
};
use tracing::instrument;

use crate::{
    domain::{PaymentsService, StoreError},
    rest::{
        RestStore, eq,
        rows::{NewPaymentRow, PaymentRow},
        single,
    },
};

const PAYMENTS: &str = "payments";

#[async_trait]
impl PaymentsService for RestStore {
    #[instrument(skip(self, payment), fields(number = %payment.number, method = %payment.method))]
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let rows: Vec<PaymentRow> = self
            .insert(PAYMENTS, &[NewPaymentRow::from(payment)])
            .await?;

        Ok(Payment::try_from(single(rows, "payment")?)?)
    }

    #[instrument(skip(self))]
    async fn list_payments(&self, order: OrderUuid) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<PaymentRow> = self
            .select(
                PAYMENTS,
                "*",
                &[
                    ("order_id", eq(order)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
