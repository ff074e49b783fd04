//! Pending payments
//!
//! Orders handed over on pay-later, or whose payment capture failed part way,
//! stay completed with a pending or partial payment status until someone
//! settles them here.

use std::sync::Arc;

use jiff::Timestamp;
use petshop::{
    numbers::payment_number,
    orders::{Order, OrderError, OrderUuid, PaymentStatus},
    payments::{NewPayment, Payment, SettledPayment, Settlement, SettlementError, Tender},
    prices::{Price, zero},
};
use rusty_money::MoneyError;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{OrdersService, PaymentsService, StoreError};

#[derive(Debug, Error)]
pub enum PendingPaymentError {
    #[error("order {0} is not awaiting payment")]
    NotAwaitingPayment(String),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A settled pending order.
#[derive(Debug, Clone)]
pub struct PendingSettlement {
    pub order: Order,
    pub settled: SettledPayment,
    pub payments: Vec<Payment>,
}

#[derive(Clone)]
pub struct PendingPayments {
    orders: Arc<dyn OrdersService>,
    payments: Arc<dyn PaymentsService>,
}

impl std::fmt::Debug for PendingPayments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPayments").finish_non_exhaustive()
    }
}

impl PendingPayments {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>, payments: Arc<dyn PaymentsService>) -> Self {
        Self { orders, payments }
    }

    /// Completed orders still waiting on payment, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read.
    pub async fn list(&self) -> Result<Vec<Order>, PendingPaymentError> {
        Ok(self.orders.list_pending_payments().await?)
    }

    /// Pending orders whose number, customer name or phone contains `term`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read.
    pub async fn search(&self, term: &str) -> Result<Vec<Order>, PendingPaymentError> {
        let orders = self.list().await?;

        Ok(filter_orders(orders, term))
    }

    /// What is still owed on an order, after any partial payments.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read.
    pub async fn amount_due(&self, order: &Order) -> Result<Price, PendingPaymentError> {
        let paid = self
            .payments
            .list_payments(order.uuid)
            .await?
            .iter()
            .try_fold(zero(), |total, payment| total.add(payment.amount))?;

        if paid.to_minor_units() >= order.total.to_minor_units() {
            return Ok(zero());
        }

        Ok(order.total.sub(paid)?)
    }

    /// Settles a pending order with `tenders`.
    ///
    /// The tenders are validated against the amount due before anything is
    /// written: cash may exceed it and gives change, other methods may not.
    ///
    /// # Errors
    ///
    /// - [`PendingPaymentError::NotAwaitingPayment`]: the order is already
    ///   paid or not completed.
    /// - [`PendingPaymentError::Settlement`]: the tenders don't cover what is due.
    /// - [`PendingPaymentError::Store`]: a read or write failed.
    #[instrument(skip(self, tenders), fields(tenders = tenders.len()))]
    pub async fn pay(
        &self,
        order: OrderUuid,
        tenders: Vec<Tender>,
        now: Timestamp,
    ) -> Result<PendingSettlement, PendingPaymentError> {
        let mut current = self.orders.get_order(order).await?;

        if !current.is_awaiting_payment() {
            return Err(PendingPaymentError::NotAwaitingPayment(current.number));
        }

        let due = self.amount_due(&current).await?;
        let settled = Settlement::PayNow(tenders).validate(due)?;

        current.set_payment_status(PaymentStatus::Paid, now)?;

        let mut payments = Vec::with_capacity(settled.applied.len());

        for tender in &settled.applied {
            let number = payment_number(now, &mut rand::thread_rng());

            payments.push(
                self.payments
                    .create_payment(NewPayment::from_tender(current.uuid, number, tender))
                    .await?,
            );
        }

        let paid = self.orders.mark_paid(current.uuid, current.total, now).await?;

        info!(order = %paid.number, amount = %due, "pending payment settled");

        Ok(PendingSettlement {
            order: paid,
            settled,
            payments,
        })
    }

    /// Sum of what is still owed across every pending order.
    ///
    /// # Errors
    ///
    /// Returns the store error of a failed read, or a money error on overflow.
    pub async fn total_pending(&self) -> Result<Price, PendingPaymentError> {
        let mut total = zero();

        for order in self.list().await? {
            total = total.add(self.amount_due(&order).await?)?;
        }

        Ok(total)
    }
}

fn filter_orders(orders: Vec<Order>, term: &str) -> Vec<Order> {
    let term = term.trim().to_lowercase();

    if term.is_empty() {
        return orders;
    }

    let contains = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&term));

    orders
        .into_iter()
        .filter(|order| {
            contains(Some(&order.number))
                || contains(order.customer_name.as_deref())
                || contains(order.customer_phone.as_deref())
        })
        .collect()
}
