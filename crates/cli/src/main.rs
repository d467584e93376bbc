//! GreenCart CLI - the plant shop from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept in GREENCART_SESSION_FILE)
//! greencart login -e ada@example.com -p secret
//!
//! # Browse
//! greencart home
//! greencart plants --category succulents
//! greencart plant 7
//!
//! # Shop
//! greencart cart add 7 --size Medium --quantity 2
//! greencart checkout --method 1 --address "12 Fern Lane"
//!
//! # Role dashboards
//! greencart seller dashboard
//! greencart admin orders
//! greencart delivery pending
//!
//! # Where would a path land for the current user?
//! greencart route /admin/reports
//! ```
//!
//! # Environment Variables
//!
//! - `GREENCART_API_BASE_URL` - Backend base URL
//! - `GREENCART_SESSION_FILE` - Session file; without it every run is signed out
//! - `GREENCART_HTTP_TIMEOUT_SECS` - Request timeout
//! - `GREENCART_AUTH_SCHEME` - `Authorization` scheme, `Token` by default
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use greencart_client::{ApiClient, ClientConfig, Navigation, Route, Session};
use greencart_core::{DeliveryConfirmation, OrderId, PlantId, Role, UserId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod render;

#[derive(Parser)]
#[command(name = "greencart")]
#[command(author, version, about = "GreenCart plant shop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "GREENCART_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup(SignupArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Top categories, plants and sellers
    Home,
    /// Browse plants by category or search
    Plants {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,
        /// List categories instead of plants
        #[arg(long)]
        categories: bool,
    },
    /// Show one plant with its sizes and reviews
    Plant {
        id: PlantId,
        /// Review pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Order the selected cart items
    Checkout {
        /// Delivery method ID; omit to list methods
        #[arg(short, long)]
        method: Option<i64>,
        #[arg(short, long, default_value = "")]
        address: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Customer orders
    Orders {
        #[command(subcommand)]
        action: Option<OrdersAction>,
    },
    /// Profile of the signed-in user
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Seller dashboard
    Seller {
        #[command(subcommand)]
        action: Option<SellerAction>,
    },
    /// Admin dashboard
    Admin {
        #[command(subcommand)]
        action: Option<AdminAction>,
    },
    /// Delivery agent dashboard
    Delivery {
        #[command(subcommand)]
        action: Option<DeliveryAction>,
    },
    /// Resolve a path to the page the current user would land on
    Route { path: String },
}

#[derive(clap::Args)]
struct SignupArgs {
    #[arg(short, long)]
    username: String,
    #[arg(short, long)]
    email: String,
    #[arg(short, long, env = "GREENCART_PASSWORD", hide_env_values = true)]
    password: String,
    /// Repeat the password
    #[arg(long)]
    confirm: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    /// `customer`, `seller`, `delivery_agent` or `admin`
    #[arg(short, long, default_value = "customer")]
    role: Role,
    /// Required for every role but `customer`
    #[arg(long, env = "GREENCART_SECRET_KEY", hide_env_values = true, default_value = "")]
    secret_key: String,
}

#[derive(Subcommand)]
pub enum CartAction {
    /// List cart lines
    Show,
    /// Add a plant
    Add {
        plant: PlantId,
        #[arg(short, long)]
        size: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Flip a line's checkout selection
    Toggle { line: i64 },
    /// Set a line's quantity
    Qty { line: i64, quantity: u32 },
    /// Remove a line
    Remove { line: i64 },
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// Every order
    All,
    /// Delivered by the agent, awaiting your confirmation
    Pending,
    /// Delivered orders open for review
    Delivered,
    /// Order totals
    Stats,
    /// One order with its items
    Show { id: OrderId },
    /// Confirm you received an order
    Confirm { id: OrderId },
    /// Review a plant from a delivered order
    Review {
        order: OrderId,
        plant: PlantId,
        #[arg(short, long)]
        rating: u8,
        #[arg(short, long, default_value = "")]
        text: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// New profile picture
        #[arg(long)]
        picture: Option<String>,
    },
    /// Delete the account and sign out
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct PlantArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub price: greencart_core::Money,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    /// Category IDs
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<i64>,
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub care_tips: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<String>,
    /// Already uploaded image URLs
    #[arg(long, value_delimiter = ',')]
    pub images: Vec<String>,
}

#[derive(Subcommand)]
pub enum SellerAction {
    Dashboard,
    /// Listed plants
    Plants,
    /// List a new plant, optionally attaching image files
    Add {
        #[command(flatten)]
        plant: PlantArgs,
        #[arg(long = "attach")]
        attachments: Vec<String>,
    },
    /// Show a plant's editable fields
    Show { id: PlantId },
    /// Replace a plant's fields
    Edit {
        id: PlantId,
        #[command(flatten)]
        plant: PlantArgs,
    },
    /// Upload image files and print their URLs
    Upload { files: Vec<String> },
    /// Sales history
    Sales,
    /// Record an offline sale
    RecordSale {
        plant: PlantId,
        #[arg(short, long)]
        quantity: u32,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        price: greencart_core::Money,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    Dashboard,
    /// All orders, or one order
    Orders { id: Option<OrderId> },
    /// Assign an order to a delivery agent
    Assign { order: OrderId, agent: UserId },
    /// Order overview and discounts
    Sales,
    /// Users of a role
    Users {
        #[arg(default_value = "customer")]
        role: Role,
    },
    /// Delete a customer
    DeleteCustomer { id: UserId },
    /// Stock alerts, agent performance and activity
    Reports {
        /// Show resolved alerts instead of open ones
        #[arg(long)]
        resolved: bool,
        /// Per-plant stock details instead of alerts
        #[arg(long, conflicts_with = "resolved")]
        details: bool,
        #[arg(long)]
        activity_type: Option<String>,
    },
    /// Delivery agents and their availability
    Delivery,
    /// Discount types, or discounts
    Discounts {
        #[arg(long)]
        active: bool,
        #[arg(long)]
        types: bool,
    },
    /// Apply a discount to a category or plant
    Discount {
        #[arg(long = "type")]
        type_id: i64,
        #[arg(long)]
        value: greencart_core::Money,
        #[arg(long)]
        percentage: bool,
        /// `YYYY-MM-DDTHH:MM`
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        plant: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum DeliveryAction {
    Dashboard,
    Assigned,
    Pending,
    Completed,
    Earnings {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Report the outcome of a delivery
    Confirm {
        order: OrderId,
        #[arg(long, default_value = "delivered")]
        outcome: DeliveryConfirmation,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Move an assignment to a new status
    Status {
        order: OrderId,
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Mark an assignment delivered
    Delivered {
        order: OrderId,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            render::error(&e.to_string());
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greencart_cli=warn,greencart_client=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        render::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> error::Result<()> {
    let session = Session::restore(config.storage()?)?;
    let api = ApiClient::new(config, session.clone())?;

    if let Some(user) = session.user() {
        error::set_sentry_user(&user.user_id, Some(user.email.as_str()));
    }

    let result = dispatch(cli.command, &api).await;

    // A 401 anywhere expires the session; send the user back to login.
    let expired = result.as_ref().is_err_and(error::CliError::is_unauthorized);
    if expired || session.pending_navigation() == Navigation::Login {
        session.acknowledge_navigation();
        error::clear_sentry_user();
        render::redirect(&Route::Login);
    }
    result
}

async fn dispatch(command: Commands, api: &ApiClient) -> error::Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::account::login(api, email, password).await?;
        }
        Commands::Signup(args) => {
            let form = greencart_client::forms::SignupForm {
                username: args.username,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm,
                first_name: args.first_name,
                last_name: args.last_name,
                phone: args.phone,
                address: args.address,
                role: args.role,
                secret_key: args.secret_key,
            };
            commands::account::signup(api, &form).await?;
        }
        Commands::Logout => commands::account::logout(api)?,
        Commands::Whoami => commands::account::whoami(api).await?,
        Commands::Profile { action } => {
            commands::account::profile(api, action.unwrap_or(ProfileAction::Show)).await?;
        }
        Commands::Home => commands::shop::home(api).await?,
        Commands::Plants {
            category,
            search,
            categories,
        } => {
            commands::shop::plants(api, category.as_deref(), search.as_deref(), categories)
                .await?;
        }
        Commands::Plant { id, pages } => commands::shop::plant(api, id, pages).await?,
        Commands::Cart { action } => {
            commands::shop::cart(api, action.unwrap_or(CartAction::Show)).await?;
        }
        Commands::Checkout {
            method,
            address,
            notes,
        } => commands::shop::checkout(api, method, address, notes).await?,
        Commands::Orders { action } => {
            commands::orders::run(api, action.unwrap_or(OrdersAction::All)).await?;
        }
        Commands::Seller { action } => {
            commands::seller::run(api, action.unwrap_or(SellerAction::Dashboard)).await?;
        }
        Commands::Admin { action } => {
            commands::admin::run(api, action.unwrap_or(AdminAction::Dashboard)).await?;
        }
        Commands::Delivery { action } => {
            commands::delivery::run(api, action.unwrap_or(DeliveryAction::Dashboard)).await?;
        }
        Commands::Route { path } => commands::route(api, &path),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cart_add_parses_size_and_quantity() {
        let cli = Cli::try_parse_from([
            "greencart", "cart", "add", "7", "--size", "Medium", "--quantity", "2",
        ]);
        let Ok(Cli {
            command:
                Commands::Cart {
                    action: Some(CartAction::Add { plant, size, quantity }),
                },
        }) = cli
        else {
            panic!("cart add did not parse");
        };
        assert_eq!(plant, PlantId::new(7));
        assert_eq!(size, "Medium");
        assert_eq!(quantity, 2);
    }

    #[test]
    fn test_admin_users_accepts_role_aliases() {
        let cli = Cli::try_parse_from(["greencart", "admin", "users", "delivery"]);
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::Admin {
                    action: Some(AdminAction::Users {
                        role: Role::DeliveryAgent
                    })
                }
            })
        ));
    }
}
