//! uvs entry point.
//!
//! This file is intentionally thin: it loads `.env.local`, sets up tracing,
//! parses the command tree, and hands off. All handlers live in
//! `commands/`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "uvs")]
#[command(about = "Universe Store fulfillment CLI", long_about = None)]
struct Cli {
    /// Settings file (YAML). Built-in defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the product catalog
    Catalog,

    /// Order commands
    Order {
        #[command(subcommand)]
        cmd: OrderCmd,
    },
}

#[derive(Subcommand)]
enum OrderCmd {
    /// Place a new order
    Place {
        /// What you want delivered
        #[arg(long)]
        item: String,

        /// Where it should land (your current state)
        #[arg(long)]
        address: String,

        /// Optional delivery wish
        #[arg(long)]
        delivery_request: Option<String>,

        /// Current mental state
        #[arg(long, default_value = "already received")]
        mental_state: String,

        /// Price label override (defaults from the catalog entry)
        #[arg(long)]
        price: Option<String>,
    },

    /// List order history, newest first
    List,

    /// Show live delivery progress for one order
    Track {
        #[arg(long)]
        order_number: String,
    },

    /// Send the delivered notification for a completed order
    Delivered {
        #[arg(long)]
        order_number: String,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent when missing —
    // production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let ctx = commands::Context::build(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Catalog => commands::catalog::print(&ctx),
        Commands::Order { cmd } => match cmd {
            OrderCmd::Place {
                item,
                address,
                delivery_request,
                mental_state,
                price,
            } => commands::order::place(&ctx, item, address, delivery_request, mental_state, price),
            OrderCmd::List => commands::order::list(&ctx),
            OrderCmd::Track { order_number } => commands::order::track(&ctx, &order_number),
            OrderCmd::Delivered { order_number } => commands::order::delivered(&ctx, &order_number),
        },
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
