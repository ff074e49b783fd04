//! Payments
//!
//! Settlement of an order total with one or more tenders, or deferred to later.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rusty_money::MoneyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    orders::{OrderUuid, PaymentStatus},
    prices::{Price, zero},
    uuids::TypedUuid,
};

/// Payment Id
pub type PaymentUuid = TypedUuid<Payment>;

/// How a tender is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the counter, the only method that gives change
    Cash,

    /// GCash e-wallet
    Gcash,

    /// Maya e-wallet
    Maya,

    /// Debit or credit card
    Card,

    /// Bank transfer
    BankTransfer,

    /// QR Ph scan-to-pay, carries a processing fee on the storefront
    #[serde(rename = "qrph")]
    QrPh,

    /// Anything else
    Other,
}

impl PaymentMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 7] = [
        Self::Cash,
        Self::Gcash,
        Self::Maya,
        Self::Card,
        Self::BankTransfer,
        Self::QrPh,
        Self::Other,
    ];

    /// Wire value stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Gcash => "gcash",
            Self::Maya => "maya",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::QrPh => "qrph",
            Self::Other => "other",
        }
    }

    /// Whether over-tendering produces change.
    pub fn gives_change(self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cash => "Cash",
            Self::Gcash => "GCash",
            Self::Maya => "Maya",
            Self::Card => "Card",
            Self::BankTransfer => "Bank Transfer",
            Self::QrPh => "QR PH",
            Self::Other => "Other",
        })
    }
}

/// Unrecognised payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");

        match normalized.as_str() {
            "cash" => Ok(Self::Cash),
            "gcash" => Ok(Self::Gcash),
            "maya" | "paymaya" => Ok(Self::Maya),
            "card" => Ok(Self::Card),
            "bank_transfer" | "bank" => Ok(Self::BankTransfer),
            "qrph" | "qr_ph" => Ok(Self::QrPh),
            "other" => Ok(Self::Other),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// An amount handed over with one method.
#[derive(Debug, Clone, PartialEq)]
pub struct Tender {
    /// Method
    pub method: PaymentMethod,

    /// Amount handed over
    pub amount: Price,

    /// Wallet, card or transfer reference
    pub reference: Option<String>,
}

impl Tender {
    /// A tender without reference.
    #[must_use]
    pub fn new(method: PaymentMethod, amount: Price) -> Self {
        Self {
            method,
            amount,
            reference: None,
        }
    }

    /// Sets the reference and returns the tender.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// How a sale is settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Paid now, possibly split across methods
    PayNow(Vec<Tender>),

    /// Goods leave now, payment is collected later
    PayLater,
}

/// Errors validating a settlement.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    /// Pay-now without any tender.
    #[error("at least one payment is required")]
    NoTenders,

    /// A tender of zero or less.
    #[error("{0} payment must be greater than zero")]
    NonPositiveAmount(PaymentMethod),

    /// Tenders do not cover the total.
    #[error("payment of {tendered} does not cover the total of {required}")]
    InsufficientPayment {
        /// Order total
        required: Price,

        /// Sum of tenders
        tendered: Price,
    },

    /// Non-cash tenders exceed the total; only cash gives change.
    #[error("non-cash payments of {non_cash} exceed the total of {required}")]
    NonCashOverpayment {
        /// Order total
        required: Price,

        /// Sum of non-cash tenders
        non_cash: Price,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Result of validating a [`Settlement`] against an order total.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledPayment {
    /// Tenders to record, each with the amount actually kept
    pub applied: Vec<Tender>,

    /// Sum of what was handed over
    pub tendered: Price,

    /// Cash handed back
    pub change: Price,

    /// Payment status the order should carry once the tenders are recorded
    pub status: PaymentStatus,
}

impl Settlement {
    /// Validates the settlement against `total` before anything is written.
    ///
    /// Non-cash tenders are kept in full. Cash covers whatever remains and any
    /// excess is returned as change. Pay-later always validates, leaving the
    /// order pending.
    ///
    /// # Errors
    ///
    /// - [`SettlementError::NoTenders`]: pay-now with no tender.
    /// - [`SettlementError::NonPositiveAmount`]: a tender of zero or less.
    /// - [`SettlementError::NonCashOverpayment`]: non-cash tenders exceed the total.
    /// - [`SettlementError::InsufficientPayment`]: tenders fall short of the total.
    pub fn validate(&self, total: Price) -> Result<SettledPayment, SettlementError> {
        let tenders = match self {
            Self::PayLater => {
                return Ok(SettledPayment {
                    applied: Vec::new(),
                    tendered: zero(),
                    change: zero(),
                    status: PaymentStatus::Pending,
                });
            }
            Self::PayNow(tenders) => tenders,
        };

        if tenders.is_empty() {
            return Err(SettlementError::NoTenders);
        }

        if let Some(tender) = tenders.iter().find(|t| t.amount.to_minor_units() <= 0) {
            return Err(SettlementError::NonPositiveAmount(tender.method));
        }

        let mut tendered = zero();
        let mut non_cash = zero();

        for tender in tenders {
            tendered = tendered.add(tender.amount)?;

            if !tender.method.gives_change() {
                non_cash = non_cash.add(tender.amount)?;
            }
        }

        if tendered.to_minor_units() < total.to_minor_units() {
            return Err(SettlementError::InsufficientPayment {
                required: total,
                tendered,
            });
        }

        if non_cash.to_minor_units() > total.to_minor_units() {
            return Err(SettlementError::NonCashOverpayment {
                required: total,
                non_cash,
            });
        }

        let change = tendered.sub(total)?;
        let mut cash_due = total.sub(non_cash)?;
        let mut applied = Vec::with_capacity(tenders.len());

        for tender in tenders {
            if !tender.method.gives_change() {
                applied.push(tender.clone());
                continue;
            }

            let kept = if tender.amount.to_minor_units() > cash_due.to_minor_units() {
                cash_due
            } else {
                tender.amount
            };

            cash_due = cash_due.sub(kept)?;

            if kept.to_minor_units() > 0 {
                applied.push(Tender {
                    amount: kept,
                    ..tender.clone()
                });
            }
        }

        Ok(SettledPayment {
            applied,
            tendered,
            change,
            status: PaymentStatus::Paid,
        })
    }

    /// Whether payment is deferred.
    pub fn is_pay_later(&self) -> bool {
        matches!(self, Self::PayLater)
    }
}

/// A recorded payment against an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// Payment id
    pub uuid: PaymentUuid,

    /// Human-readable number, `PAY-YYYYMMDD-NNNN`
    pub number: String,

    /// Order paid
    pub order: OrderUuid,

    /// Method
    pub method: PaymentMethod,

    /// Amount kept
    pub amount: Price,

    /// Reference number
    pub reference: Option<String>,

    /// When the payment was recorded
    pub created_at: Timestamp,
}

/// A payment about to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// Human-readable number, `PAY-YYYYMMDD-NNNN`
    pub number: String,

    /// Order paid
    pub order: OrderUuid,

    /// Method
    pub method: PaymentMethod,

    /// Amount kept
    pub amount: Price,

    /// Reference number
    pub reference: Option<String>,
}

impl NewPayment {
    /// A payment for `order` from an applied tender.
    #[must_use]
    pub fn from_tender(order: OrderUuid, number: String, tender: &Tender) -> Self {
        Self {
            number,
            order,
            method: tender.method,
            amount: tender.amount,
            reference: tender.reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::prices::pesos;

    use super::*;

    #[test]
    fn cash_over_tender_gives_change() -> TestResult {
        let settlement = Settlement::PayNow(vec![Tender::new(PaymentMethod::Cash, pesos(500))]);

        let settled = settlement.validate(pesos(435))?;

        assert_eq!(settled.change, pesos(65));
        assert_eq!(settled.tendered, pesos(500));
        assert_eq!(
            settled.applied,
            vec![Tender::new(PaymentMethod::Cash, pesos(435))]
        );
        assert_eq!(settled.status, PaymentStatus::Paid);

        Ok(())
    }

    #[test]
    fn split_payment_keeps_wallet_in_full() -> TestResult {
        let settlement = Settlement::PayNow(vec![
            Tender::new(PaymentMethod::Gcash, pesos(300)).with_reference("GC-1"),
            Tender::new(PaymentMethod::Cash, pesos(200)),
        ]);

        let settled = settlement.validate(pesos(435))?;

        assert_eq!(settled.change, pesos(65));
        assert_eq!(
            settled.applied,
            vec![
                Tender::new(PaymentMethod::Gcash, pesos(300)).with_reference("GC-1"),
                Tender::new(PaymentMethod::Cash, pesos(135)),
            ]
        );

        Ok(())
    }

    #[test]
    fn short_payment_is_rejected() {
        let settlement = Settlement::PayNow(vec![Tender::new(PaymentMethod::Cash, pesos(400))]);

        assert_eq!(
            settlement.validate(pesos(435)),
            Err(SettlementError::InsufficientPayment {
                required: pesos(435),
                tendered: pesos(400),
            })
        );
    }

    #[test]
    fn card_overpayment_is_rejected() {
        let settlement = Settlement::PayNow(vec![Tender::new(PaymentMethod::Card, pesos(500))]);

        assert!(matches!(
            settlement.validate(pesos(435)),
            Err(SettlementError::NonCashOverpayment { .. })
        ));
    }

    #[test]
    fn empty_and_zero_tenders_are_rejected() {
        assert_eq!(
            Settlement::PayNow(Vec::new()).validate(pesos(10)),
            Err(SettlementError::NoTenders)
        );
        assert_eq!(
            Settlement::PayNow(vec![Tender::new(PaymentMethod::Maya, zero())]).validate(pesos(10)),
            Err(SettlementError::NonPositiveAmount(PaymentMethod::Maya))
        );
    }

    #[test]
    fn pay_later_leaves_payment_pending() -> TestResult {
        let settled = Settlement::PayLater.validate(pesos(435))?;

        assert!(settled.applied.is_empty());
        assert_eq!(settled.status, PaymentStatus::Pending);

        Ok(())
    }

    #[test]
    fn methods_parse_from_wire_and_display_names() -> TestResult {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>()?, method);
        }

        assert_eq!("QR PH".parse::<PaymentMethod>()?, PaymentMethod::QrPh);
        assert_eq!("Bank Transfer".parse::<PaymentMethod>()?, PaymentMethod::BankTransfer);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());

        Ok(())
    }
}
