//! Sales
//!
//! Rings up a cart: checks live stock, records the order and its payments,
//! completes it and reconciles stock afterwards.

use std::sync::Arc;

use jiff::Timestamp;
use petshop::{
    cart::{CartLine, product_quantities},
    customers::CustomerUuid,
    numbers::{order_number, payment_number},
    orders::{Order, OrderDraft, OrderType, PaymentStatus},
    payments::{NewPayment, Payment, SettledPayment, Settlement},
    receipt::Receipt,
};
use rustc_hash::FxHashMap;
use tracing::{info, instrument, warn};

use crate::{
    config::SettleWindow,
    domain::{InventoryService, OrdersService, PaymentsService},
};

mod errors;
pub mod reconcile;

pub use errors::SaleError;
pub use reconcile::{CorrectionStatus, SnapshotEntry, StockCorrection, StockSnapshot};

/// Who the sale is for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleCustomer {
    pub order_type: OrderType,
    pub customer: Option<CustomerUuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl SaleCustomer {
    /// A walk-in customer known by name.
    pub fn walk_in(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    fn trimmed_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
    }
}

/// What happened to a completed sale.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    /// The order as stored after completion
    pub order: Order,

    /// The order as submitted
    pub draft: OrderDraft,

    /// Settlement the order was rung up with
    pub settled: SettledPayment,

    /// Payments recorded
    pub payments: Vec<Payment>,

    /// Why payment capture stopped, if it did. The sale still went through.
    pub payment_failure: Option<String>,

    /// Stock that had to be overwritten after the store's decrement
    pub corrections: Vec<StockCorrection>,

    /// Why stock could not be verified, if it couldn't
    pub reconciliation_failure: Option<String>,
}

impl SaleOutcome {
    pub fn receipt(&self, shop_name: &str, issued_at: Timestamp) -> Receipt {
        Receipt::new(shop_name, &self.draft, &self.settled, issued_at)
    }
}

/// Sale completion against the store.
#[derive(Clone)]
pub struct SalesService {
    orders: Arc<dyn OrdersService>,
    payments: Arc<dyn PaymentsService>,
    inventory: Arc<dyn InventoryService>,
    settle: SettleWindow,
}

impl std::fmt::Debug for SalesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesService")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl SalesService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        payments: Arc<dyn PaymentsService>,
        inventory: Arc<dyn InventoryService>,
        settle: SettleWindow,
    ) -> Self {
        Self {
            orders,
            payments,
            inventory,
            settle,
        }
    }

    /// Completes a sale of `lines`.
    ///
    /// Validation and the live stock check happen before anything is written.
    /// Once the order exists, a failed payment no longer stops the sale: the
    /// order is completed as pending (or partial) and the failure is reported
    /// on the outcome. Stock drift after completion is corrected and reported,
    /// never returned as an error.
    ///
    /// # Errors
    ///
    /// See [`SaleError`].
    #[instrument(skip_all, fields(lines = lines.len(), pay_later = settlement.is_pay_later()))]
    pub async fn complete_sale(
        &self,
        lines: &[CartLine],
        settlement: &Settlement,
        customer: SaleCustomer,
        now: Timestamp,
    ) -> Result<SaleOutcome, SaleError> {
        if lines.is_empty() {
            return Err(SaleError::EmptyCart);
        }

        let name = customer.trimmed_name();

        if customer.order_type == OrderType::InStore && name.is_none() {
            return Err(SaleError::MissingCustomerName);
        }

        let number = order_number(now, &mut rand::thread_rng());
        let draft = OrderDraft::from_cart(number, customer.order_type, lines)?.with_customer(
            customer.customer,
            name,
            customer.phone.clone(),
        );

        let settled = settlement.validate(draft.total)?;
        let snapshot = self.check_stock(lines).await?;

        let order = self.orders.create_order(&draft, now).await?;

        info!(order = %order.number, total = %draft.total, "order created");

        let (payments, payment_failure) = self.record_payments(&order, &settled, now).await;

        let status = match (&payment_failure, payments.len()) {
            (None, _) => settled.status,
            (Some(_), 0) => PaymentStatus::Pending,
            (Some(_), _) => PaymentStatus::Partial,
        };

        let order = self
            .orders
            .complete_order(order.uuid, status, now)
            .await
            .map_err(|source| SaleError::Incomplete {
                order: order.number.clone(),
                source,
            })?;

        info!(order = %order.number, payment_status = %order.payment_status, "order completed");

        let (corrections, reconciliation_failure) = self.reconcile(&snapshot, now).await;

        Ok(SaleOutcome {
            order,
            draft,
            settled,
            payments,
            payment_failure,
            corrections,
            reconciliation_failure,
        })
    }

    /// Reads live stock for every product in the sale and rejects the sale if a
    /// tracked product can't cover it. The read doubles as the snapshot the
    /// reconciliation compares against.
    async fn check_stock(&self, lines: &[CartLine]) -> Result<StockSnapshot, SaleError> {
        let quantities = product_quantities(lines);
        let products = quantities.iter().map(|q| q.product).collect::<Vec<_>>();

        let live: FxHashMap<_, _> = self
            .inventory
            .inventory_for(&products)
            .await?
            .into_iter()
            .filter(|record| record.tracked)
            .map(|record| (record.product, record))
            .collect();

        let mut snapshot = StockSnapshot::default();

        for quantity in quantities {
            let Some(record) = live.get(&quantity.product) else {
                continue;
            };

            if record.current_stock <= 0 {
                return Err(SaleError::OutOfStock {
                    product: quantity.name,
                });
            }

            if u64::try_from(record.current_stock).unwrap_or(0) < quantity.quantity {
                return Err(SaleError::InsufficientStock {
                    product: quantity.name,
                    available: record.current_stock,
                    requested: quantity.quantity,
                });
            }

            snapshot.push(SnapshotEntry {
                product: quantity.product,
                name: quantity.name,
                before: record.current_stock,
                sold: quantity.quantity,
            });
        }

        Ok(snapshot)
    }

    /// Records each applied tender, stopping at the first failure.
    async fn record_payments(
        &self,
        order: &Order,
        settled: &SettledPayment,
        now: Timestamp,
    ) -> (Vec<Payment>, Option<String>) {
        let mut payments = Vec::with_capacity(settled.applied.len());

        for tender in &settled.applied {
            let number = payment_number(now, &mut rand::thread_rng());

            match self
                .payments
                .create_payment(NewPayment::from_tender(order.uuid, number, tender))
                .await
            {
                Ok(payment) => payments.push(payment),
                Err(source) => {
                    warn!(
                        order = %order.number,
                        method = %tender.method,
                        "payment capture failed, order stays unpaid: {source}"
                    );

                    return (payments, Some(source.to_string()));
                }
            }
        }

        (payments, None)
    }

    async fn reconcile(
        &self,
        snapshot: &StockSnapshot,
        now: Timestamp,
    ) -> (Vec<StockCorrection>, Option<String>) {
        if snapshot.is_empty() {
            return (Vec::new(), None);
        }

        match reconcile::await_settled(self.inventory.as_ref(), snapshot, self.settle).await {
            Ok(observed) => (
                reconcile::repair(self.inventory.as_ref(), snapshot, observed, now).await,
                None,
            ),
            Err(source) => {
                warn!("could not verify stock after sale: {source}");

                (Vec::new(), Some(source.to_string()))
            }
        }
    }
}
