use clap::{Args, Subcommand};
use jiff::Timestamp;
use petshop::customers::{Customer, NewCustomer, PetProfile};
use petshop_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomersSubcommand {
    /// Active customers, newest first
    List,

    /// Customers whose phone contains the given digits
    Find(FindArgs),

    /// Register a customer
    Create(CreateArgs),
}

#[derive(Debug, Args)]
struct FindArgs {
    /// Part of the phone number
    phone: String,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    pet_name: Option<String>,

    /// Dog, cat, ...
    #[arg(long)]
    pet_type: Option<String>,

    #[arg(long)]
    pet_breed: Option<String>,

    /// Age in years
    #[arg(long)]
    pet_age: Option<u8>,
}

pub(crate) async fn run(ctx: &AppContext, command: CustomersCommand) -> Result<(), String> {
    match command.command {
        CustomersSubcommand::List => {
            let customers = ctx
                .customers
                .list_customers()
                .await
                .map_err(|error| format!("failed to list customers: {error}"))?;

            customers.iter().for_each(print_customer);
        }
        CustomersSubcommand::Find(args) => {
            let customers = ctx
                .customers
                .find_by_phone(args.phone.trim())
                .await
                .map_err(|error| format!("failed to search customers: {error}"))?;

            if customers.is_empty() {
                println!("no customers found");
            }

            customers.iter().for_each(print_customer);
        }
        CustomersSubcommand::Create(args) => {
            let mut customer = NewCustomer::new(args.name, args.phone, Timestamp::now())
                .map_err(|error| error.to_string())?
                .with_pet(PetProfile {
                    name: args.pet_name,
                    kind: args.pet_type,
                    breed: args.pet_breed,
                    age: args.pet_age,
                });

            customer.email = args.email;
            customer.address = args.address;

            let created = ctx
                .customers
                .create_customer(customer)
                .await
                .map_err(|error| format!("failed to create customer: {error}"))?;

            println!("customer_uuid: {}", created.uuid);
            println!("customer_code: {}", created.code);
        }
    }

    Ok(())
}

fn print_customer(customer: &Customer) {
    let pet = match (&customer.pet.name, &customer.pet.kind) {
        (Some(name), Some(kind)) => format!("{name} ({kind})"),
        (Some(name), None) => name.clone(),
        (None, Some(kind)) => kind.clone(),
        (None, None) => "-".to_string(),
    };

    println!(
        "{}  {}  {}  {}  orders {}  spent {}  points {}",
        customer.code,
        customer.name,
        customer.phone,
        pet,
        customer.total_orders,
        customer.total_spent,
        customer.loyalty_points
    );
}
