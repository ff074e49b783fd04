use clap::{Args, Subcommand};
use jiff::Timestamp;
use petshop::{inventory::InventoryRecord, products::ProductUuid};
use petshop_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct InventoryCommand {
    #[command(subcommand)]
    command: InventorySubcommand,
}

#[derive(Debug, Subcommand)]
enum InventorySubcommand {
    /// Tracked stock, lowest first
    List,

    /// Products at or below their minimum
    Low,

    /// Record a manual recount
    Adjust(AdjustArgs),

    /// Create records for products without one
    Sync,

    /// Cost uncosted records at their product's base price
    BackfillCosts,

    /// Reset negative stock and stale flags
    Repair,

    /// Value tracked stock at unit cost
    Valuation,
}

#[derive(Debug, Args)]
struct AdjustArgs {
    /// Product to recount
    #[arg(long)]
    product: ProductUuid,

    /// Counted units
    #[arg(long)]
    quantity: i64,

    /// Why the count changed
    #[arg(long)]
    reason: String,
}

pub(crate) async fn run(ctx: &AppContext, command: InventoryCommand) -> Result<(), String> {
    let maintenance = &ctx.maintenance;

    match command.command {
        InventorySubcommand::List => {
            let records = maintenance
                .list()
                .await
                .map_err(|error| format!("failed to list inventory: {error}"))?;

            print_records(&records);
        }
        InventorySubcommand::Low => {
            let records = maintenance
                .low_stock()
                .await
                .map_err(|error| format!("failed to list low stock: {error}"))?;

            if records.is_empty() {
                println!("all stock above minimum");
            }

            print_records(&records);
        }
        InventorySubcommand::Adjust(args) => {
            let adjustment = maintenance
                .adjust(args.product, args.quantity, &args.reason)
                .await
                .map_err(|error| format!("failed to adjust stock: {error}"))?;

            println!("{} set to {}", adjustment.product, adjustment.new_quantity);
        }
        InventorySubcommand::Sync => {
            let created = maintenance
                .sync()
                .await
                .map_err(|error| format!("failed to sync inventory: {error}"))?;

            println!("created {} inventory records", created.len());
            print_records(&created);
        }
        InventorySubcommand::BackfillCosts => {
            let updated = maintenance
                .backfill_unit_costs()
                .await
                .map_err(|error| format!("failed to backfill unit costs: {error}"))?;

            println!("updated {updated} unit costs");
        }
        InventorySubcommand::Repair => {
            let report = maintenance
                .repair(Timestamp::now())
                .await
                .map_err(|error| format!("failed to repair inventory: {error}"))?;

            println!("reset {} negative records", report.negative.len());
            println!("refreshed {} stale flags", report.stale_flags.len());
        }
        InventorySubcommand::Valuation => {
            let valuation = maintenance
                .valuation()
                .await
                .map_err(|error| format!("failed to value inventory: {error}"))?;

            println!("total_value: {}", valuation.total_value);
            println!("total_items: {}", valuation.total_items);
            println!("low_stock_items: {}", valuation.low_stock_items);
            println!("out_of_stock_items: {}", valuation.out_of_stock_items);
        }
    }

    Ok(())
}

fn print_records(records: &[InventoryRecord]) {
    for record in records {
        let status = if record.flags.out {
            "OUT"
        } else if record.flags.low {
            "LOW"
        } else {
            "ok"
        };

        println!(
            "{}  {}  {} / min {}  {}",
            record.product,
            record.product_name.as_deref().unwrap_or("?"),
            record.current_stock,
            record.minimum_stock,
            status
        );
    }
}
