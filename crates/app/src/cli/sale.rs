use std::io;

use clap::{ArgGroup, Args};
use jiff::Timestamp;
use petshop::{orders::OrderType, payments::Settlement};
use petshop_app::{
    context::AppContext,
    sales::{CorrectionStatus, SaleCustomer},
    session::Session,
};

use super::parse::{ItemSpec, TenderSpec};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("settlement").required(true).args(["pay", "pay_later"])))]
pub(crate) struct SaleArgs {
    /// Item to sell, `PRODUCT_ID[:QTY]`; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<ItemSpec>,

    /// Payment, `METHOD:AMOUNT[:REFERENCE]`; repeatable for split payments
    #[arg(long)]
    pay: Vec<TenderSpec>,

    /// Hand the goods over now and collect payment later
    #[arg(long)]
    pay_later: bool,

    /// Customer name, required for in-store sales
    #[arg(long)]
    customer_name: Option<String>,

    /// Customer phone
    #[arg(long)]
    customer_phone: Option<String>,

    /// Sell as a delivery order
    #[arg(long)]
    delivery: bool,
}

pub(crate) async fn run(ctx: &AppContext, mut session: Session, args: SaleArgs) -> Result<(), String> {
    let now = Timestamp::now();

    for item in &args.items {
        let product = ctx
            .catalog
            .get_product(item.product)
            .await
            .map_err(|error| format!("failed to load product {}: {error}", item.product))?;

        session
            .add(&product, item.quantity, None, &[], now)
            .map_err(|error| error.to_string())?;
    }

    let settlement = if args.pay_later {
        Settlement::PayLater
    } else {
        Settlement::PayNow(args.pay.into_iter().map(|TenderSpec(tender)| tender).collect())
    };

    let customer = SaleCustomer {
        order_type: if args.delivery {
            OrderType::Delivery
        } else {
            OrderType::InStore
        },
        customer: None,
        name: args.customer_name,
        phone: args.customer_phone,
    };

    let outcome = session
        .checkout(&ctx.sales, &settlement, customer, now)
        .await
        .map_err(|error| error.to_string())?;

    outcome
        .receipt(&ctx.shop_name, Timestamp::now())
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print receipt: {error}"))?;

    println!();
    println!("order_uuid: {}", outcome.order.uuid);
    println!("payment_status: {}", outcome.order.payment_status);

    if let Some(failure) = &outcome.payment_failure {
        println!("payment not recorded: {failure}");
    }

    for correction in &outcome.corrections {
        match &correction.status {
            CorrectionStatus::Repaired => println!(
                "stock corrected: {} read {}, set to {}",
                correction.name, correction.observed, correction.expected
            ),
            CorrectionStatus::Failed(reason) => println!(
                "stock NOT corrected: {} reads {}, expected {}: {reason}",
                correction.name, correction.observed, correction.expected
            ),
        }
    }

    if let Some(failure) = &outcome.reconciliation_failure {
        println!("stock could not be verified: {failure}");
    }

    Ok(())
}
