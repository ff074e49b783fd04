use clap::{Args, Subcommand};
use jiff::Timestamp;
use petshop::orders::{Order, OrderUuid};
use petshop_app::context::AppContext;

use super::parse::TenderSpec;

#[derive(Debug, Args)]
pub(crate) struct PendingCommand {
    #[command(subcommand)]
    command: PendingSubcommand,
}

#[derive(Debug, Subcommand)]
enum PendingSubcommand {
    /// Completed orders awaiting payment
    List(ListArgs),

    /// Settle a pending order
    Pay(PayArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Order number, customer name or phone to look for
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Order to settle
    #[arg(long)]
    order: OrderUuid,

    /// Payment, `METHOD:AMOUNT[:REFERENCE]`; repeatable
    #[arg(long, required = true)]
    pay: Vec<TenderSpec>,
}

pub(crate) async fn run(ctx: &AppContext, command: PendingCommand) -> Result<(), String> {
    match command.command {
        PendingSubcommand::List(args) => list(ctx, args).await,
        PendingSubcommand::Pay(args) => pay(ctx, args).await,
    }
}

async fn list(ctx: &AppContext, args: ListArgs) -> Result<(), String> {
    let orders = match args.search.as_deref() {
        Some(term) => ctx.pending.search(term).await,
        None => ctx.pending.list().await,
    }
    .map_err(|error| format!("failed to list pending payments: {error}"))?;

    if orders.is_empty() {
        println!("no pending payments");
        return Ok(());
    }

    for order in &orders {
        print_order(order);
    }

    let total = ctx
        .pending
        .total_pending()
        .await
        .map_err(|error| format!("failed to total pending payments: {error}"))?;

    println!("total pending: {total}");

    Ok(())
}

async fn pay(ctx: &AppContext, args: PayArgs) -> Result<(), String> {
    let tenders = args.pay.into_iter().map(|TenderSpec(tender)| tender).collect();

    let settlement = ctx
        .pending
        .pay(args.order, tenders, Timestamp::now())
        .await
        .map_err(|error| format!("failed to settle order: {error}"))?;

    println!("order_number: {}", settlement.order.number);
    println!("payment_status: {}", settlement.order.payment_status);
    println!("change: {}", settlement.settled.change);

    for payment in &settlement.payments {
        println!("payment: {} {} {}", payment.number, payment.method, payment.amount);
    }

    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "{}  {}  {}  {}  {}",
        order.uuid,
        order.number,
        order.customer_name.as_deref().unwrap_or("Walk-in Customer"),
        order.customer_phone.as_deref().unwrap_or("-"),
        order.total
    );
}
