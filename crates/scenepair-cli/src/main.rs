mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scenepair", about = "Find paired satellite scenes and highlight movement")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find scene pairs in a saved catalog search result
    Pairs(commands::pairs::PairsArgs),
    /// Composite two overlapping rasters into a GeoTIFF and GIF
    Composite(commands::composite::CompositeArgs),
    /// Composite every pair listed in a manifest
    Batch(commands::batch::BatchArgs),
    /// Show raster georeferencing metadata
    Info(commands::info::InfoArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Pairs(args) => commands::pairs::run(args),
        Commands::Composite(args) => commands::composite::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
