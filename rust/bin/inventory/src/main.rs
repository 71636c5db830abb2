//! `inventory` — command-line front end for the inventory catalog.
//!
//! Usage:
//!   inventory [-c <config.toml>] [--data-dir <dir>] [--db <file>] [-o table|json] <command>
//!
//! Without flags the database is `./inventory.db`.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use catalog::UserError;
use clap::{Parser, Subcommand};
use inventory_core::ServiceConfig;

use output::Format;

/// Inventory tracker.
#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Track products and their serial numbers")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Directory holding inventory.db (overrides the config file).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Database file (overrides --data-dir and the config file).
    #[arg(long = "db", global = true)]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Format::Table)]
    output: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List products whose name, type or barcode contains FILTER.
    Products {
        /// Substring to search for (case-insensitive). Omit to list everything.
        filter: Option<String>,
    },

    /// Register a product.
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        product_type: String,
        /// Whole number; negative values are accepted.
        #[arg(long, allow_hyphen_values = true)]
        quantity: String,
        /// Must not already be in use.
        #[arg(long)]
        barcode: String,
    },

    /// List the serial numbers of a product.
    Serials { product_id: i64 },

    /// Attach a serial number to a product. Without --serial nothing is added.
    AddSerial {
        product_id: i64,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// Replace the note on a serial number. Without --note nothing changes;
    /// `--note ""` clears it.
    SetNote {
        serial_id: i64,
        #[arg(long)]
        note: Option<String>,
    },

    /// Show version.
    Version,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error".into()),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.output;

    if let Commands::Version = cli.command {
        println!("inventory v{}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    }
    .with_overrides(cli.data_dir.clone(), cli.db.clone());

    let svc = commands::open_service(&config)?;

    let result = match cli.command {
        Commands::Products { filter } => {
            commands::list_products(&svc, filter.as_deref().unwrap_or(""), format)
        }
        Commands::AddProduct {
            name,
            product_type,
            quantity,
            barcode,
        } => commands::add_product(&svc, &name, &product_type, &quantity, &barcode, format),
        Commands::Serials { product_id } => commands::list_serials(&svc, product_id, format),
        Commands::AddSerial {
            product_id,
            serial,
            note,
        } => commands::add_serial(&svc, product_id, serial.as_deref(), note.as_deref(), format),
        Commands::SetNote { serial_id, note } => {
            commands::set_note(&svc, serial_id, note.as_deref(), format)
        }
        Commands::Version => Ok(()),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<UserError>() {
            Some(user_err) => {
                eprintln!("{}", output::user_error(format, user_err));
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}
