use clap::{Args, Subcommand};
use decimal_percentage::Percentage;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use petshop_app::{context::AppContext, domain::StoreError};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct ReportsCommand {
    #[command(subcommand)]
    command: ReportsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReportsSubcommand {
    /// Sales summary over a date range, today by default
    Daily(DailyArgs),

    /// Best sellers
    Products(PeriodArgs),

    /// Takings per payment method
    Payments(PeriodArgs),

    /// Orders and sales per staff member
    Staff(PeriodArgs),

    /// Customer counts and loyalty points
    Customers,

    /// Stock value as computed by the store
    Inventory,
}

#[derive(Debug, Args)]
struct DailyArgs {
    /// First day, `YYYY-MM-DD`
    #[arg(long)]
    start: Option<Date>,

    /// Last day, `YYYY-MM-DD`; defaults to the first day
    #[arg(long)]
    end: Option<Date>,
}

#[derive(Debug, Args)]
struct PeriodArgs {
    /// How many days back to report on
    #[arg(long, default_value_t = 30)]
    days: u32,
}

pub(crate) async fn run(ctx: &AppContext, command: ReportsCommand) -> Result<(), String> {
    let reports = &ctx.reports;
    let failed = |error: StoreError| format!("failed to run report: {error}");

    match command.command {
        ReportsSubcommand::Daily(args) => {
            let start = args.start.unwrap_or_else(today);
            let end = args.end.unwrap_or(start);

            let summary = reports.sales_summary(start, end).await.map_err(failed)?;

            println!("period: {} to {}", summary.start, summary.end);
            println!("total_orders: {}", summary.total_orders);
            println!("total_sales: {}", summary.total_sales);
            println!("total_paid: {}", summary.total_paid);
            println!("average_order_value: {}", summary.average_order_value);
            println!("total_customers: {}", summary.total_customers);
            println!("total_items_sold: {}", summary.total_items_sold);
        }
        ReportsSubcommand::Products(args) => {
            for row in reports.product_performance(args.days).await.map_err(failed)? {
                println!(
                    "{}  qty {}  orders {}  revenue {}  margin {}",
                    row.product_name,
                    row.total_quantity,
                    row.times_ordered,
                    row.total_revenue,
                    row.profit_margin
                        .map_or_else(|| "-".to_string(), |margin| format!("{}%", percent_points(margin)))
                );
            }
        }
        ReportsSubcommand::Payments(args) => {
            for row in reports.payment_breakdown(args.days).await.map_err(failed)? {
                println!(
                    "{}  {}  {} transactions  {}%",
                    row.payment_method,
                    row.total_amount,
                    row.transaction_count,
                    percent_points(row.percentage)
                );
            }
        }
        ReportsSubcommand::Staff(args) => {
            for row in reports.staff_performance(args.days).await.map_err(failed)? {
                println!(
                    "{}  orders {}  sales {}  average {}  per day {}",
                    row.staff_name,
                    row.total_orders,
                    row.total_sales,
                    row.average_order_value,
                    row.orders_per_day.round_dp(1)
                );
            }
        }
        ReportsSubcommand::Customers => {
            let analytics = reports.customer_analytics().await.map_err(failed)?;

            println!("total_customers: {}", analytics.total_customers);
            println!("active_customers: {}", optional(analytics.active_customers));
            println!("total_loyalty_points: {}", optional(analytics.total_loyalty_points));
        }
        ReportsSubcommand::Inventory => {
            let valuation = reports.inventory_valuation().await.map_err(failed)?;

            println!("total_value: {}", valuation.total_value);
            println!("total_items: {}", valuation.total_items);
            println!("low_stock_items: {}", optional(valuation.low_stock_items));
            println!("out_of_stock_items: {}", optional(valuation.out_of_stock_items));
        }
    }

    Ok(())
}

/// Days are reported in Philippine time.
fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::fixed(jiff::tz::offset(8))).date()
}

fn percent_points(percentage: Percentage) -> Decimal {
    (percentage * Decimal::ONE_HUNDRED).round_dp(1)
}

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}
