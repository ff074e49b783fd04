//! Orders

use std::fmt;

use jiff::Timestamp;
use rusty_money::MoneyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLine,
    customers::CustomerUuid,
    prices::{Price, zero},
    pricing::{PricingError, line_total, total_price},
    products::ProductUuid,
    uuids::TypedUuid,
};

/// Order Id
pub type OrderUuid = TypedUuid<Order>;

/// Where the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Walk-in sale at the counter
    #[default]
    #[serde(rename = "in-store")]
    InStore,

    /// Storefront order
    #[serde(rename = "online")]
    Online,

    /// Delivered order
    #[serde(rename = "delivery")]
    Delivery,
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing collected yet
    Pending,

    /// Fully paid
    Paid,

    /// Some payments recorded, not all
    Partial,

    /// Money returned
    Refunded,
}

impl PaymentStatus {
    /// Whether the status may move to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Partial)
                | (Self::Partial, Self::Paid)
                | (Self::Paid, Self::Refunded)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Refunded => "refunded",
        })
    }
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, nothing handed over
    Pending,

    /// Being prepared
    Processing,

    /// Handed over; completing an order is what decrements stock
    Completed,

    /// Abandoned
    Cancelled,
}

impl OrderStatus {
    /// Whether the status may move to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Processing | Self::Completed | Self::Cancelled
            ) | (Self::Processing, Self::Completed | Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Errors building or updating orders.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// No lines.
    #[error("an order needs at least one item")]
    Empty,

    /// Discount larger than the subtotal.
    #[error("discount of {discount} exceeds the subtotal of {subtotal}")]
    DiscountExceedsSubtotal {
        /// Requested discount
        discount: Price,

        /// Order subtotal
        subtotal: Price,
    },

    /// Refused payment status change.
    #[error("payment status cannot move from {0} to {1}")]
    PaymentTransition(PaymentStatus, PaymentStatus),

    /// Refused order status change.
    #[error("order status cannot move from {0} to {1}")]
    StatusTransition(OrderStatus, OrderStatus),

    /// Line arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A sold line, frozen into the order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Product sold
    pub product: ProductUuid,

    /// Name printed on the order, including options
    pub name: String,

    /// Unit price charged
    pub unit_price: Price,

    /// Units sold
    pub quantity: u32,

    /// Unit price times quantity
    pub total: Price,
}

impl OrderLine {
    /// Freezes a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total overflows.
    pub fn from_cart_line(line: &CartLine) -> Result<Self, PricingError> {
        Ok(Self {
            product: line.product(),
            name: line.describe(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
            total: line.total()?,
        })
    }

    /// A line from raw parts, computing its total.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total overflows.
    pub fn new(
        product: ProductUuid,
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            product,
            name: name.into(),
            unit_price,
            quantity,
            total: line_total(unit_price, quantity)?,
        })
    }
}

/// An order ready to be submitted. Financial fields are final once built.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Human-readable number, `ORD-YYYYMMDD-NNNN`
    pub number: String,

    /// Channel
    pub order_type: OrderType,

    /// Registered customer, if any
    pub customer: Option<CustomerUuid>,

    /// Name given at the counter
    pub customer_name: Option<String>,

    /// Phone given at the counter
    pub customer_phone: Option<String>,

    /// Sold lines
    pub lines: Vec<OrderLine>,

    /// Sum of line totals
    pub subtotal: Price,

    /// Discount taken off the subtotal
    pub discount: Price,

    /// Delivery fee added on top
    pub delivery_fee: Price,

    /// Amount due
    pub total: Price,
}

impl OrderDraft {
    /// Builds a draft from order lines.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Empty`]: no lines.
    /// - [`OrderError::Pricing`] / [`OrderError::Money`]: totals overflowed.
    pub fn new(
        number: String,
        order_type: OrderType,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Empty);
        }

        let subtotal = total_price(lines.iter().map(|line| line.total))?;

        Ok(Self {
            number,
            order_type,
            customer: None,
            customer_name: None,
            customer_phone: None,
            lines,
            subtotal,
            discount: zero(),
            delivery_fee: zero(),
            total: subtotal,
        })
    }

    /// Builds a draft from cart lines.
    ///
    /// # Errors
    ///
    /// See [`OrderDraft::new`].
    pub fn from_cart(
        number: String,
        order_type: OrderType,
        lines: &[CartLine],
    ) -> Result<Self, OrderError> {
        let lines = lines
            .iter()
            .map(OrderLine::from_cart_line)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(number, order_type, lines)
    }

    /// Attaches customer details.
    #[must_use]
    pub fn with_customer(
        mut self,
        customer: Option<CustomerUuid>,
        name: Option<String>,
        phone: Option<String>,
    ) -> Self {
        self.customer = customer;
        self.customer_name = name;
        self.customer_phone = phone;
        self
    }

    /// Applies a discount and a delivery fee, recomputing the total.
    ///
    /// # Errors
    ///
    /// - [`OrderError::DiscountExceedsSubtotal`]: discount above the subtotal.
    /// - [`OrderError::Money`]: arithmetic failed.
    pub fn with_adjustments(mut self, discount: Price, delivery_fee: Price) -> Result<Self, OrderError> {
        if discount.to_minor_units() > self.subtotal.to_minor_units() {
            return Err(OrderError::DiscountExceedsSubtotal {
                discount,
                subtotal: self.subtotal,
            });
        }

        self.discount = discount;
        self.delivery_fee = delivery_fee;
        self.total = self.subtotal.sub(discount)?.add(delivery_fee)?;

        Ok(self)
    }

    /// Total units across lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// A stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order id
    pub uuid: OrderUuid,

    /// Human-readable number
    pub number: String,

    /// Channel
    pub order_type: OrderType,

    /// Registered customer
    pub customer: Option<CustomerUuid>,

    /// Name given at the counter
    pub customer_name: Option<String>,

    /// Phone given at the counter
    pub customer_phone: Option<String>,

    /// Sum of line totals
    pub subtotal: Price,

    /// Discount taken off
    pub discount: Price,

    /// Delivery fee
    pub delivery_fee: Price,

    /// Amount due
    pub total: Price,

    /// Payment state
    pub payment_status: PaymentStatus,

    /// Fulfilment state
    pub status: OrderStatus,

    /// Placed at
    pub ordered_at: Timestamp,

    /// Fully paid at
    pub paid_at: Option<Timestamp>,

    /// Completed at
    pub completed_at: Option<Timestamp>,
}

impl Order {
    /// Moves the payment status, stamping `paid_at` when it becomes paid.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::PaymentTransition`] for a refused transition.
    pub fn set_payment_status(&mut self, next: PaymentStatus, now: Timestamp) -> Result<(), OrderError> {
        if !self.payment_status.can_transition_to(next) {
            return Err(OrderError::PaymentTransition(self.payment_status, next));
        }

        self.payment_status = next;

        if next == PaymentStatus::Paid {
            self.paid_at = Some(now);
        }

        Ok(())
    }

    /// Moves the order status, stamping `completed_at` on completion.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::StatusTransition`] for a refused transition.
    pub fn set_status(&mut self, next: OrderStatus, now: Timestamp) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::StatusTransition(self.status, next));
        }

        self.status = next;

        if next == OrderStatus::Completed {
            self.completed_at = Some(now);
        }

        Ok(())
    }

    /// Completed but not yet paid.
    pub fn is_awaiting_payment(&self) -> bool {
        self.status == OrderStatus::Completed
            && matches!(self.payment_status, PaymentStatus::Pending | PaymentStatus::Partial)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::prices::pesos;

    use super::*;

    fn line(name: &str, price: i64, quantity: u32) -> Result<OrderLine, PricingError> {
        OrderLine::new(ProductUuid::new(), name, pesos(price), quantity)
    }

    fn order(total: i64) -> Order {
        Order {
            uuid: OrderUuid::new(),
            number: "ORD-20261018-0001".to_string(),
            order_type: OrderType::InStore,
            customer: None,
            customer_name: None,
            customer_phone: None,
            subtotal: pesos(total),
            discount: zero(),
            delivery_fee: zero(),
            total: pesos(total),
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            ordered_at: Timestamp::UNIX_EPOCH,
            paid_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn draft_sums_lines() -> TestResult {
        let draft = OrderDraft::new(
            "ORD-20261018-0001".to_string(),
            OrderType::InStore,
            vec![line("Kibble", 100, 3)?, line("Leash", 250, 1)?],
        )?;

        assert_eq!(draft.subtotal, pesos(550));
        assert_eq!(draft.total, pesos(550));
        assert_eq!(draft.total_items(), 4);

        Ok(())
    }

    #[test]
    fn empty_draft_is_rejected() {
        assert_eq!(
            OrderDraft::new(String::new(), OrderType::Online, Vec::new()),
            Err(OrderError::Empty)
        );
    }

    #[test]
    fn adjustments_recompute_total() -> TestResult {
        let draft = OrderDraft::new(String::new(), OrderType::Delivery, vec![line("Kibble", 100, 3)?])?
            .with_adjustments(pesos(50), pesos(60))?;

        assert_eq!(draft.total, pesos(310));

        Ok(())
    }

    #[test]
    fn discount_above_subtotal_is_rejected() -> TestResult {
        let draft = OrderDraft::new(String::new(), OrderType::InStore, vec![line("Kibble", 100, 1)?])?;

        assert!(matches!(
            draft.with_adjustments(pesos(101), zero()),
            Err(OrderError::DiscountExceedsSubtotal { .. })
        ));

        Ok(())
    }

    #[test]
    fn payment_status_transitions() {
        use PaymentStatus::{Paid, Partial, Pending, Refunded};

        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Partial));
        assert!(Partial.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Refunded));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Refunded.can_transition_to(Paid));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn order_status_transitions() {
        use OrderStatus::{Cancelled, Completed, Pending, Processing};

        assert!(Pending.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Processing));
    }

    #[test]
    fn completing_and_paying_stamp_times() -> TestResult {
        let mut order = order(100);
        let now = Timestamp::now();

        order.set_status(OrderStatus::Completed, now)?;
        assert!(order.is_awaiting_payment());

        order.set_payment_status(PaymentStatus::Paid, now)?;
        assert_eq!(order.completed_at, Some(now));
        assert_eq!(order.paid_at, Some(now));
        assert!(!order.is_awaiting_payment());

        assert_eq!(
            order.set_payment_status(PaymentStatus::Pending, now),
            Err(OrderError::PaymentTransition(PaymentStatus::Paid, PaymentStatus::Pending))
        );

        Ok(())
    }

    #[test]
    fn order_type_wire_names() -> TestResult {
        assert_eq!(serde_json::to_string(&OrderType::InStore)?, "\"in-store\"");
        assert_eq!(serde_json::from_str::<OrderType>("\"delivery\"")?, OrderType::Delivery);

        Ok(())
    }
}
