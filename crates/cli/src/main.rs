//! Handlekurv CLI - Shopping list, savings and recipes from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse products and deals
//! handlekurv products list --search melk
//! handlekurv products deals --page 2
//!
//! # Build the shopping list
//! handlekurv cart add 101 --quantity 2
//! handlekurv cart show
//!
//! # Confirm a purchase of two products, bringing two bags
//! handlekurv purchase 101 202 --bags 2
//! handlekurv savings
//!
//! # Profile and recipes
//! handlekurv profile set --name Ola --gender male --weight 70 --height 175 --age 25 \
//!     --activity moderately_active --objective health_maintenance
//! handlekurv recipes
//! ```
//!
//! # Commands
//!
//! - `products` - Browse the catalog
//! - `cart` - Manage the shopping list
//! - `purchase` - Confirm bought items and record savings
//! - `savings` - Show money and CO2 saved
//! - `profile` - Show or edit the body/activity profile
//! - `stores` - Find physical stores for the shopping list
//! - `recipes` - Recommend recipes for the profile

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use handlekurv_app::{AppConfig, AppState, FileStore, ProductQuery, Result};
use handlekurv_core::{Position, ProductId};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::profile::ProfileUpdate;

#[derive(Parser)]
#[command(name = "handlekurv")]
#[command(author, version, about = "Grocery prices, shopping list and savings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping list
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Confirm purchased products and record the savings
    Purchase {
        /// Product IDs that were bought
        ids: Vec<ProductId>,

        /// Purchase everything on the shopping list
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Number of reusable bags brought (omit if none)
        #[arg(short, long)]
        bags: Option<u32>,
    },
    /// Show money and CO2 saved so far
    Savings,
    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Find physical stores
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
    /// Recommend recipes for the saved profile
    Recipes {
        /// Number of extra suggestions
        #[arg(short, long)]
        suggestions: Option<u32>,

        /// Allowed calorie deviation, as a fraction (e.g. 0.1)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List or search products
    List(ListingArgs),
    /// List products currently on sale
    Deals(ListingArgs),
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Args)]
struct ListingArgs {
    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// Page number (1-based)
    #[arg(short, long)]
    page: Option<u32>,

    /// Products per page
    #[arg(long)]
    size: Option<u32>,

    /// Filter by brand
    #[arg(long)]
    brand: Option<String>,

    /// Filter by vendor
    #[arg(long)]
    vendor: Option<String>,

    /// Minimum price in kroner
    #[arg(long)]
    price_min: Option<Decimal>,

    /// Maximum price in kroner
    #[arg(long)]
    price_max: Option<Decimal>,

    /// Sort order (e.g. `price_asc`, `price_desc`, `date_desc`)
    #[arg(long)]
    sort: Option<String>,

    /// Collapse the same product across chains
    #[arg(long)]
    unique: bool,
}

impl From<ListingArgs> for ProductQuery {
    fn from(args: ListingArgs) -> Self {
        Self {
            search: args.search,
            page: args.page,
            size: args.size,
            vendor: args.vendor,
            brand: args.brand,
            price_min: args.price_min,
            price_max: args.price_max,
            unique: args.unique.then_some(true),
            exclude_without_ean: None,
            sort: args.sort,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the shopping list grouped by store
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove one unit of a product
    Remove {
        /// Product ID
        id: ProductId,

        /// Remove every unit
        #[arg(long)]
        all: bool,
    },
    /// Empty the shopping list
    Clear,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the saved profile
    Show,
    /// Create or update the profile
    Set {
        #[arg(long)]
        name: Option<String>,

        /// `male` or `female`
        #[arg(long)]
        gender: Option<String>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<String>,

        /// Height in cm
        #[arg(long)]
        height: Option<String>,

        /// Age in years
        #[arg(long)]
        age: Option<String>,

        /// `sedentary`, `lightly_active`, `moderately_active`, `very_active` or `extra_active`
        #[arg(long)]
        activity: Option<String>,

        /// `weight_loss`, `muscle_gain` or `health_maintenance`
        #[arg(long)]
        objective: Option<String>,

        /// Path or URI of a profile picture
        #[arg(long)]
        picture: Option<String>,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// Stores for the chains in the shopping list
    Nearby {
        /// Latitude of the search centre
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the search centre
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
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

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "handlekurv=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let state = AppState::open(config).await;

    match run(cli.command, &state).await {
        Ok(text) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{text}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !e.is_validation() {
                sentry::capture_error(&e);
            }
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, state: &AppState<FileStore>) -> Result<String> {
    let text = match command {
        Commands::Products { action } => match action {
            ProductsAction::List(args) => commands::products::list(state, &args.into()).await?,
            ProductsAction::Deals(args) => commands::products::deals(state, &args.into()).await?,
            ProductsAction::Show { id } => commands::products::show(state, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state),
            CartAction::Add { id, quantity } => commands::cart::add(state, id, quantity).await?,
            CartAction::Remove { id, all } => commands::cart::remove(state, id, all).await,
            CartAction::Clear => commands::cart::clear(state).await,
        },
        Commands::Purchase { ids, all, bags } => {
            commands::purchase::purchase(state, &ids, all, bags).await?
        }
        Commands::Savings => commands::purchase::savings(state),
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(state),
            ProfileAction::Set {
                name,
                gender,
                weight,
                height,
                age,
                activity,
                objective,
                picture,
            } => {
                let update = ProfileUpdate {
                    name,
                    gender,
                    weight,
                    height,
                    age,
                    activity,
                    objective,
                    picture,
                };
                commands::profile::set(state, update).await?
            }
        },
        Commands::Stores { action } => match action {
            StoresAction::Nearby { lat, lng } => {
                let position = lat.zip(lng).map(|(lat, lng)| Position { lat, lng });
                commands::stores::nearby(state, position).await
            }
        },
        Commands::Recipes {
            suggestions,
            tolerance,
        } => commands::recipes::recommend(state, suggestions, tolerance).await?,
    };
    Ok(text)
}
