use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use petshop_app::{
    config::{LoggingConfig, SaleConfig, SessionConfig, StoreConfig},
    context::AppContext,
    session::{Session, StaffGate},
};
use zeroize::Zeroizing;

mod catalog;
mod customers;
mod inventory;
mod parse;
mod pending;
mod reports;
mod sale;

#[derive(Debug, Parser)]
#[command(name = "petshop-app", about = "Petshop point of sale", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    sale: SaleConfig,

    #[command(flatten)]
    session: SessionConfig,

    /// Staff password for this run; prompted for when omitted
    #[arg(long, env = "PETSHOP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Inventory(inventory::InventoryCommand),
    Sale(sale::SaleArgs),
    Pending(pending::PendingCommand),
    Customers(customers::CustomersCommand),
    Reports(reports::ReportsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let session = self.unlock()?;

        let ctx = AppContext::from_config(&self.store, &self.sale)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Catalog(command) => catalog::run(&ctx, command).await,
            Commands::Inventory(command) => inventory::run(&ctx, command).await,
            Commands::Sale(args) => sale::run(&ctx, session, args).await,
            Commands::Pending(command) => pending::run(&ctx, command).await,
            Commands::Customers(command) => customers::run(&ctx, command).await,
            Commands::Reports(command) => reports::run(&ctx, command).await,
        }
    }

    fn unlock(&self) -> Result<Session, String> {
        let attempt = match &self.password {
            Some(password) => Zeroizing::new(password.clone()),
            None => prompt_password()?,
        };

        StaffGate::new(self.session.password())
            .unlock(&attempt)
            .map_err(|error| error.to_string())
    }
}

fn prompt_password() -> Result<Zeroizing<String>, String> {
    eprint!("staff password: ");
    io::stderr()
        .flush()
        .map_err(|error| format!("failed to prompt: {error}"))?;

    let mut line = Zeroizing::new(String::new());

    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|error| format!("failed to read password: {error}"))?;

    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string()))
}

