//! Checkout
//!
//! Storefront orders are not paid in the app. The cart is turned into a chat
//! message which the shopper sends to the shop's page through a deep link.

use std::fmt::{self, Write as _};

use decimal_percentage::Percentage;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use rusty_money::MoneyError;
use thiserror::Error;

use crate::{
    cart::Cart,
    payments::PaymentMethod,
    prices::{self, Price, PriceError, zero},
    pricing::PricingError,
};

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Base of the Messenger deep link.
pub const MESSENGER_BASE: &str = "https://m.me";

/// Errors building the order message.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required field was left blank.
    #[error("{0} is required")]
    Missing(&'static str),

    /// Cash handed over does not cover the total.
    #[error("cash of {paid} does not cover the total of {required}")]
    CashShort {
        /// Order total including fees
        required: Price,

        /// Cash offered
        paid: Price,
    },

    /// Fee could not be represented.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Cart totals overflowed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How the shopper receives the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Service {
    /// Collected at the shop
    Pickup(PickupTime),

    /// Brought to the shopper
    Delivery {
        /// Street address
        address: String,

        /// Nearby landmark
        landmark: Option<String>,
    },

    /// Eaten or used on the premises
    DineIn,
}

impl Service {
    fn label(&self) -> &'static str {
        match self {
            Self::Pickup(_) => "Pickup",
            Self::Delivery { .. } => "Delivery",
            Self::DineIn => "Dine-in",
        }
    }
}

/// When a pickup order is collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupTime {
    /// In this many minutes
    InMinutes(u32),

    /// Free-form time entered by the shopper
    Custom(String),
}

impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMinutes(minutes) => write!(f, "{minutes} minutes"),
            Self::Custom(time) => f.write_str(time),
        }
    }
}

/// How the shopper intends to pay.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPayment {
    /// Cash on pickup or delivery
    Cash {
        /// Amount the shopper will hand over
        amount_paid: Price,

        /// e.g. "please bring change for 1000"
        change_note: Option<String>,
    },

    /// E-wallet, card or transfer, proven by a screenshot in the chat
    Method(PaymentMethod),
}

/// Everything the shopper fills in at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutDetails {
    /// Shopper name
    pub customer_name: String,

    /// Phone number
    pub contact_number: String,

    /// Pickup, delivery or dine-in
    pub service: Service,

    /// Payment intent
    pub payment: CheckoutPayment,

    /// Free-form notes
    pub notes: Option<String>,
}

/// A ready-to-send order message.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderMessage {
    /// Cart total
    pub subtotal: Price,

    /// QR PH convenience fee, zero for other methods
    pub fee: Price,

    /// Subtotal plus fee
    pub total: Price,

    /// Cash change due, zero for other methods
    pub change: Price,

    /// Message body
    pub text: String,
}

/// The QR PH convenience fee rate.
pub fn qrph_fee_rate() -> Percentage {
    Percentage::from(Decimal::new(1, 2))
}

/// QR PH fee on `subtotal`, rounded to the centavo.
///
/// # Errors
///
/// Returns [`PriceError`] if the fee does not fit.
pub fn qrph_fee(subtotal: Price) -> Result<Price, PriceError> {
    prices::from_decimal(qrph_fee_rate() * prices::to_decimal(subtotal))
}

impl OrderMessage {
    /// Builds the message for `cart` as sent to `shop_name`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: nothing in the cart.
    /// - [`CheckoutError::Missing`]: name, contact, address or pickup time blank.
    /// - [`CheckoutError::CashShort`]: cash does not cover the total.
    pub fn build(shop_name: &str, cart: &Cart, details: &CheckoutDetails) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        validate(details)?;

        let subtotal = cart.total_price()?;
        let fee = match details.payment {
            CheckoutPayment::Method(PaymentMethod::QrPh) => qrph_fee(subtotal)?,
            _ => zero(),
        };
        let total = subtotal.add(fee)?;

        let change = match &details.payment {
            CheckoutPayment::Cash { amount_paid, .. } => {
                if amount_paid.to_minor_units() < total.to_minor_units() {
                    return Err(CheckoutError::CashShort {
                        required: total,
                        paid: *amount_paid,
                    });
                }

                amount_paid.sub(total)?
            }
            CheckoutPayment::Method(_) => zero(),
        };

        let text = render(shop_name, cart, details, subtotal, fee, total, change)?;

        Ok(Self {
            subtotal,
            fee,
            total,
            change,
            text,
        })
    }

    /// `https://m.me/{page_id}?text={message}` with the message URI-encoded.
    pub fn deep_link(&self, page_id: &str) -> String {
        format!(
            "{MESSENGER_BASE}/{}?text={}",
            utf8_percent_encode(page_id, URI_COMPONENT),
            utf8_percent_encode(&self.text, URI_COMPONENT)
        )
    }
}

fn validate(details: &CheckoutDetails) -> Result<(), CheckoutError> {
    if details.customer_name.trim().is_empty() {
        return Err(CheckoutError::Missing("name"));
    }

    if details.contact_number.trim().is_empty() {
        return Err(CheckoutError::Missing("contact number"));
    }

    match &details.service {
        Service::Delivery { address, .. } if address.trim().is_empty() => {
            Err(CheckoutError::Missing("delivery address"))
        }
        Service::Pickup(PickupTime::Custom(time)) if time.trim().is_empty() => {
            Err(CheckoutError::Missing("pickup time"))
        }
        _ => Ok(()),
    }
}

fn render(
    shop_name: &str,
    cart: &Cart,
    details: &CheckoutDetails,
    subtotal: Price,
    fee: Price,
    total: Price,
    change: Price,
) -> Result<String, CheckoutError> {
    let mut text = String::new();

    // Writing to a String never fails.
    _ = writeln!(text, "🛒 {shop_name} ORDER\n");
    _ = writeln!(text, "👤 Customer: {}", details.customer_name.trim());
    _ = writeln!(text, "📞 Contact: {}", details.contact_number.trim());
    _ = writeln!(text, "📍 Service: {}", details.service.label());

    match &details.service {
        Service::Delivery { address, landmark } => {
            _ = writeln!(text, "🏠 Address: {}", address.trim());

            if let Some(landmark) = landmark.as_deref().filter(|l| !l.trim().is_empty()) {
                _ = writeln!(text, "🗺️ Landmark: {}", landmark.trim());
            }
        }
        Service::Pickup(time) => {
            _ = writeln!(text, "⏰ Pickup Time: {time}");
        }
        Service::DineIn => {}
    }

    _ = writeln!(text, "\n📋 ORDER DETAILS:");

    let mut items = Vec::with_capacity(cart.len());

    for line in cart.lines() {
        items.push(format!(
            "• {} {} x {} - {}",
            line.describe(),
            line.unit_price(),
            line.quantity(),
            line.total()?
        ));
    }

    _ = writeln!(text, "{}\n", items.join("\n\n"));
    _ = writeln!(text, "💰 SUBTOTAL: {subtotal}");

    if fee.to_minor_units() > 0 {
        _ = writeln!(text, "💳 QR PH Fee (1%): {fee}");
    }

    _ = writeln!(text, "\n💰 TOTAL: {total}\n");

    match &details.payment {
        CheckoutPayment::Cash {
            amount_paid,
            change_note,
        } => {
            _ = writeln!(text, "💳 Payment: {}", PaymentMethod::Cash);
            _ = writeln!(text, "💰 Amount Paid: {amount_paid}");

            if change.to_minor_units() > 0 {
                _ = writeln!(text, "🔄 Change: {change}");
            }

            if let Some(note) = change_note.as_deref().filter(|n| !n.trim().is_empty()) {
                _ = writeln!(text, "📝 Change Note: {}", note.trim());
            }
        }
        CheckoutPayment::Method(method) => {
            _ = writeln!(text, "💳 Payment: {method}");
            _ = writeln!(
                text,
                "📸 Payment Screenshot: Please attach your payment receipt screenshot"
            );

            if fee.to_minor_units() > 0 {
                _ = writeln!(text, "💡 Note: 1% QR PH convenience fee included");
            }
        }
    }

    if let Some(notes) = details.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        _ = writeln!(text, "\n📝 Notes: {}", notes.trim());
    }

    _ = write!(
        text,
        "\nPlease confirm this order to proceed. Thank you for choosing {shop_name}!"
    );

    Ok(text)
}
