mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nearby")]
#[command(about = "Browse nearby businesses by category")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List categories and their subcategories
    Categories,
    /// List businesses in a subcategory, nearest first when a location is given
    Query {
        #[arg(long)]
        category: String,

        #[arg(long)]
        subcategory: String,

        /// Device latitude; requires --lon
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Device longitude; requires --lat
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Behave as if location permission was refused
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        deny_location: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up the street address for a coordinate pair
    Address {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("nearby: pass a subcommand (categories, query, address); see --help");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(nearby_core::log_level_from_env()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Categories => {
            commands::run_categories(&nearby_core::categories_path_from_env())?;
        }
        Commands::Query {
            category,
            subcategory,
            lat,
            lon,
            deny_location,
            json,
        } => {
            let device = commands::DeviceLocation::from_flags(lat, lon, deny_location)?;
            let config = nearby_core::load_app_config_from_env()?;
            commands::run_query(&config, &category, &subcategory, device, json).await?;
        }
        Commands::Address { lat, lon } => {
            let config = nearby_core::load_app_config_from_env()?;
            commands::run_address(&config, lat, lon).await?;
        }
    }

    Ok(())
}
