//! Receipt
//!
//! Plain-text receipt for a completed sale.

use std::io;

use jiff::{
    Timestamp,
    tz::{self, TimeZone},
};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    orders::{OrderDraft, OrderLine},
    payments::{SettledPayment, Tender},
    prices::Price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// How the receipt was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptPayment {
    /// Paid at the counter
    Paid {
        /// Tenders kept
        tenders: Vec<Tender>,

        /// Handed over
        tendered: Price,

        /// Handed back
        change: Price,
    },

    /// To be collected later
    PayLater,
}

/// Receipt for one order.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    shop_name: String,
    order_number: String,
    issued_at: Timestamp,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    lines: Vec<OrderLine>,
    subtotal: Price,
    discount: Price,
    delivery_fee: Price,
    total: Price,
    payment: ReceiptPayment,
}

impl Receipt {
    /// Builds a receipt for `draft` settled by `settled`.
    pub fn new(
        shop_name: impl Into<String>,
        draft: &OrderDraft,
        settled: &SettledPayment,
        issued_at: Timestamp,
    ) -> Self {
        let payment = if settled.applied.is_empty() {
            ReceiptPayment::PayLater
        } else {
            ReceiptPayment::Paid {
                tenders: settled.applied.clone(),
                tendered: settled.tendered,
                change: settled.change,
            }
        };

        Self {
            shop_name: shop_name.into(),
            order_number: draft.number.clone(),
            issued_at,
            customer_name: draft.customer_name.clone(),
            customer_phone: draft.customer_phone.clone(),
            lines: draft.lines.clone(),
            subtotal: draft.subtotal,
            discount: draft.discount,
            delivery_fee: draft.delivery_fee,
            total: draft.total,
            payment,
        }
    }

    /// Amount due
    pub fn total(&self) -> Price {
        self.total
    }

    /// Settlement shown at the bottom
    pub fn payment(&self) -> &ReceiptPayment {
        &self.payment
    }

    /// Writes the receipt, with times shown in Philippine time.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        write_header(&mut out, self)?;
        write_lines_table(&mut out, &self.lines)?;
        write_summary(&mut out, self)?;

        Ok(())
    }
}

fn store_time_zone() -> TimeZone {
    TimeZone::fixed(tz::offset(8))
}

fn write_header(out: &mut impl io::Write, receipt: &Receipt) -> Result<(), ReceiptError> {
    let local = receipt.issued_at.to_zoned(store_time_zone());

    writeln!(out, "{}", receipt.shop_name.to_uppercase()).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Order #: {}", receipt.order_number).map_err(|_err| ReceiptError::IO)?;
    writeln!(
        out,
        "Date: {}  {}",
        local.strftime("%B %-d, %Y"),
        local.strftime("%I:%M %p")
    )
    .map_err(|_err| ReceiptError::IO)?;

    let customer = receipt.customer_name.as_deref().unwrap_or("Walk-in Customer");
    writeln!(out, "Customer: {customer}").map_err(|_err| ReceiptError::IO)?;

    if let Some(phone) = &receipt.customer_phone {
        writeln!(out, "Phone: {phone}").map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

fn write_lines_table(out: &mut impl io::Write, lines: &[OrderLine]) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Unit", "Total"]);

    for line in lines {
        builder.push_record([
            line.name.clone(),
            line.quantity.to_string(),
            line.unit_price.to_string(),
            line.total.to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);
    table.modify(Columns::new(1..4), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(out: &mut impl io::Write, receipt: &Receipt) -> Result<(), ReceiptError> {
    let mut rows: Vec<(String, String)> = vec![("Subtotal:".to_string(), receipt.subtotal.to_string())];

    if receipt.discount.to_minor_units() > 0 {
        rows.push(("Discount:".to_string(), format!("-{}", receipt.discount)));
    }

    if receipt.delivery_fee.to_minor_units() > 0 {
        rows.push(("Delivery Fee:".to_string(), receipt.delivery_fee.to_string()));
    }

    rows.push(("Total:".to_string(), receipt.total.to_string()));

    match &receipt.payment {
        ReceiptPayment::PayLater => {
            rows.push(("Payment:".to_string(), "PAY LATER".to_string()));
        }
        ReceiptPayment::Paid {
            tenders,
            tendered,
            change,
        } => {
            for tender in tenders {
                rows.push((format!("{}:", tender.method), tender.amount.to_string()));
            }

            if change.to_minor_units() > 0 {
                rows.push(("Amount Paid:".to_string(), tendered.to_string()));
                rows.push(("Change:".to_string(), change.to_string()));
            }
        }
    }

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.chars().count()).max().unwrap_or(0);

    for (label, value) in &rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}").map_err(|_err| ReceiptError::IO)?;
    }

    if matches!(receipt.payment, ReceiptPayment::PayLater) {
        writeln!(out, "\nPayment to be collected later.").map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out, "\nThank you for shopping with us!").map_err(|_err| ReceiptError::IO)
}
