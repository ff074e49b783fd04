use clap::{Args, Subcommand};
use jiff::Timestamp;
use petshop::{discounts::is_discount_active, pricing::effective_base, products::Product};
use petshop_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List products with their current price and stock
    List(ListArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only show this category
    #[arg(long)]
    category: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list(ctx, args).await,
    }
}

async fn list(ctx: &AppContext, args: ListArgs) -> Result<(), String> {
    let products = ctx
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    let now = Timestamp::now();

    let products = products.into_iter().filter(|product| {
        args.category
            .as_deref()
            .is_none_or(|category| product.category.eq_ignore_ascii_case(category))
    });

    for product in products {
        println!("{}", describe(&product, now));
    }

    Ok(())
}

fn describe(product: &Product, now: Timestamp) -> String {
    let mut line = format!(
        "{}  {}  {}",
        product.uuid,
        product.name,
        effective_base(product, now)
    );

    if is_discount_active(product, now) {
        line.push_str(&format!(" (was {})", product.base_price));
    }

    match product.tracked_stock() {
        Some(stock) if stock.is_out() => line.push_str("  out of stock"),
        Some(stock) => line.push_str(&format!("  {} in stock", stock.current)),
        None => {}
    }

    if !product.available {
        line.push_str("  unavailable");
    }

    line
}
