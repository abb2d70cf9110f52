//! # StoreSim Demo Library
//!
//! Builds a sample store, walks one member through cart and checkout, and
//! prints what happened.
//!
//! ## Module Organization
//! ```text
//! storesim_cli/
//! ├── lib.rs          ◄─── You are here (args, tracing, demo flow)
//! ├── config.rs       ◄─── TOML + environment configuration
//! └── error.rs        ◄─── AppError for the binary
//! ```
//!
//! ## Usage
//! ```text
//! storesim [--config <path>] [--lookup <strategy>] [--surcharge-mode <mode>] [--json]
//!
//!   --config <path>           TOML config file
//!   --lookup <strategy>       full_scan | first_entry_only
//!   --surcharge-mode <mode>   compounding | flat
//!   --json                    print one JSON document instead of text
//! ```

pub mod config;
pub mod error;

use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use storesim_core::{
    CheckoutPolicy, Customer, LookupStrategy, Money, Product, Store, StoreError, SurchargeMode,
};
use tracing::{info, warn, Subscriber};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

use config::StoreSimConfig;
use error::{AppError, AppResult};

/// Member walked through the demo flow.
pub const DEMO_MEMBER_ID: &str = "ABC";

/// Products the demo member puts in their cart, in order.
pub const DEMO_CART: [&str; 3] = ["830", "835", "5"];

// =============================================================================
// Command Line
// =============================================================================

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub lookup: Option<LookupStrategy>,
    pub surcharge_mode: Option<SurchargeMode>,
    pub json: bool,
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--lookup" => parsed.lookup = Some(value_for(&arg, args.next())?.parse()?),
                "--surcharge-mode" => {
                    parsed.surcharge_mode = Some(value_for(&arg, args.next())?.parse()?)
                }
                "--json" => parsed.json = true,
                other => return Err(AppError::Usage(format!("Unknown argument: {}", other))),
            }
        }

        Ok(parsed)
    }

    /// Command line flags override everything else.
    pub fn apply_to(&self, config: &mut StoreSimConfig) {
        if let Some(lookup) = self.lookup {
            config.checkout.lookup = lookup;
        }
        if let Some(mode) = self.surcharge_mode {
            config.checkout.surcharge_mode = mode;
        }
    }
}

fn value_for(flag: &str, value: Option<String>) -> AppResult<String> {
    value.ok_or_else(|| AppError::Usage(format!("{} requires a value", flag)))
}

// =============================================================================
// Entry Point
// =============================================================================

/// Runs the demo against the process arguments and stdout.
pub fn run() -> AppResult<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;

    let log_filter = init_tracing();
    let config = load_config(&args, &log_filter)?;

    let policy = config.checkout_policy();
    info!(
        lookup = %policy.lookup,
        surcharge_mode = %policy.surcharge_mode,
        surcharge_bps = policy.surcharge_rate.bps(),
        "Starting StoreSim demo"
    );

    let mut store = sample_store(policy);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.json {
        run_demo_json(&mut store, &mut out)
    } else {
        run_demo(&mut store, &mut out)
    }
}

/// Handle used to swap in the configured log filter once config is loaded.
pub type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter in effect until the configuration has been read.
const STARTUP_LOG_FILTER: &str = "info";

/// Initializes the tracing subscriber for structured logging.
///
/// The subscriber is installed before the configuration is loaded so that
/// config warnings are not dropped.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storesim_core=trace` - Trace the store only
/// - Default: the configured filter
fn init_tracing() -> LogFilterHandle {
    let (subscriber, handle) = log_subscriber(std::io::stderr);
    subscriber.init();
    handle
}

/// Builds the subscriber with a reloadable filter, writing to `writer`.
pub fn log_subscriber<W>(writer: W) -> (impl Subscriber + Send + Sync, LogFilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(STARTUP_LOG_FILTER));
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));

    (subscriber, handle)
}

/// Loads the configuration, applies command line flags, and switches the
/// log filter to the configured one unless `RUST_LOG` is set.
pub fn load_config(args: &CliArgs, log_filter: &LogFilterHandle) -> AppResult<StoreSimConfig> {
    let mut config = StoreSimConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        if let Err(e) = log_filter.reload(EnvFilter::new(&config.logging.filter)) {
            warn!("Could not apply configured log filter: {}", e);
        }
    }

    Ok(config)
}

// =============================================================================
// Demo Flow
// =============================================================================

/// Three consoles and one non-premium member, David.
pub fn sample_store(policy: CheckoutPolicy) -> Store {
    let mut store = Store::with_policy(policy);
    store.add_product(Product::new(
        "830",
        "Nintendo Switch",
        "console and handheld in one video game platform made by nintendo",
        Money::from_dollars(300),
        9,
    ));
    store.add_product(Product::new(
        "835",
        "Playstation",
        "Sony videogame console",
        Money::from_dollars(400),
        5,
    ));
    store.add_product(Product::new(
        "5",
        "Xbox one",
        "Microsoft videogame console",
        Money::from_dollars(350),
        7,
    ));
    store.add_member(Customer::new("David", DEMO_MEMBER_ID, false));
    store
}

/// Prints the store, fills the demo cart, and checks out as text.
pub fn run_demo<W: Write>(store: &mut Store, out: &mut W) -> AppResult<()> {
    let policy = store.policy();
    writeln!(
        out,
        "Policy: {} lookup, {} surcharge of {:.2}%",
        policy.lookup,
        policy.surcharge_mode,
        policy.surcharge_rate.percentage()
    )?;

    writeln!(out, "Members:")?;
    for member in store.members() {
        writeln!(
            out,
            "  {} ({}) premium={}",
            member.name(),
            member.account_id(),
            member.is_premium()
        )?;
    }

    writeln!(out, "Inventory:")?;
    for product in store.inventory() {
        writeln!(
            out,
            "  {:<5} {:<16} {:>9}  qty {}",
            product.id(),
            product.title(),
            product.price().to_string(),
            product.quantity_available()
        )?;
    }

    match store.find_member(DEMO_MEMBER_ID) {
        Some(member) => writeln!(out, "Member {}: {}", DEMO_MEMBER_ID, member.name())?,
        None => writeln!(out, "Member {}: not found", DEMO_MEMBER_ID)?,
    }
    match store.find_product("835") {
        Some(product) => writeln!(out, "Product 835: {}", product.title())?,
        None => writeln!(out, "Product 835: not found")?,
    }

    let mut added = 0;
    for product_id in DEMO_CART {
        let status = store.add_product_to_member_cart(product_id, DEMO_MEMBER_ID);
        if status.is_added() {
            added += 1;
        }
        writeln!(out, "Add {}: {}", product_id, status)?;
    }
    writeln!(out, "Added {} of {} products", added, DEMO_CART.len())?;

    let cart = store
        .find_member(DEMO_MEMBER_ID)
        .map(|m| m.cart().join(", "))
        .unwrap_or_default();
    writeln!(out, "Cart: [{}]", cart)?;

    match store.checkout_member_with_receipt(DEMO_MEMBER_ID) {
        Ok(receipt) => {
            for line in &receipt.lines {
                writeln!(
                    out,
                    "  {:<16} {:>9}  running {}",
                    line.title,
                    line.unit_price.to_string(),
                    line.running_total
                )?;
            }
            for skipped in &receipt.skipped {
                writeln!(out, "  {:<16} skipped (out of stock)", skipped)?;
            }
            writeln!(out, "Total: {}", receipt.total)?;
        }
        Err(StoreError::InvalidCheckout { .. }) => writeln!(out, "Member ID not found.")?,
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Same flow as [`run_demo`], rendered as a single JSON document.
pub fn run_demo_json<W: Write>(store: &mut Store, out: &mut W) -> AppResult<()> {
    let members = serde_json::to_value(store.members())?;
    let inventory = serde_json::to_value(store.inventory())?;

    let statuses: Vec<_> = DEMO_CART
        .iter()
        .map(|id| {
            json!({
                "product_id": id,
                "status": store.add_product_to_member_cart(id, DEMO_MEMBER_ID),
            })
        })
        .collect();

    let (receipt, error) = match store.checkout_member_with_receipt(DEMO_MEMBER_ID) {
        Ok(receipt) => (serde_json::to_value(&receipt)?, None),
        Err(e @ StoreError::InvalidCheckout { .. }) => (serde_json::Value::Null, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    let document = json!({
        "members": members,
        "inventory": inventory,
        "cart": statuses,
        "receipt": receipt,
        "error": error,
    });

    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}
