//! Larder command-line driver
//!
//! Replays a scripted cart session and prints its receipt or checkout payload.
//!
//! Use `-s` to choose the session fixture
//! Use `-c` to load a store configuration instead of the USD defaults
//! Use `-f json` to print the checkout payload instead of the receipt

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use larder::{
    cart::{Cart, TracingObserver},
    checkout::CheckoutPayload,
    config::{StoreConfig, parse_price_in},
    fixtures::Session,
    receipt,
    totals::OrderTotals,
};

/// Output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Receipt table with totals.
    Table,

    /// Checkout payload JSON.
    Json,
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Larder command-line arguments
#[derive(Debug, Parser)]
#[command(name = "larder", about = "Replay a cart session and print its order totals", long_about = None)]
struct Args {
    /// Session fixture to replay
    #[arg(short, long)]
    session: PathBuf,

    /// Store configuration file
    #[arg(short, long, env = "LARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Tax supplied by checkout, overriding the session's (e.g. "1.50 USD")
    #[arg(long)]
    tax: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

/// Larder command-line entry point
pub fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let stdout = io::stdout();

    run(&args, stdout.lock())
}

fn run(args: &Args, mut out: impl Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };

    let session = Session::load(&args.session)
        .with_context(|| format!("failed to load session {}", args.session.display()))?;

    if session.currency() != config.currency() {
        bail!(
            "session is priced in {}, but the store sells in {}",
            session.currency().iso_alpha_code,
            config.currency().iso_alpha_code
        );
    }

    let tax = match args.tax.as_deref() {
        Some(tax) => parse_price_in(tax, config.currency())?,
        None => session.tax(),
    };

    let mut cart = Cart::new(config.currency());
    cart.subscribe(TracingObserver);

    session.replay_into(&mut cart)?;

    let policy = config.shipping_policy();
    let totals = OrderTotals::for_cart(&cart, policy, tax)?;

    info!(
        item_count = totals.item_count(),
        total = %totals.total(),
        "calculated order totals"
    );

    match args.format {
        OutputFormat::Table => receipt::write_to(&mut out, cart.view(), &totals, policy)?,
        OutputFormat::Json => {
            let payload = CheckoutPayload::new(cart.view(), &totals)?;

            writeln!(out, "{}", payload.to_json_pretty()?)?;
        }
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match args.log_format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}
