use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Floodline - river-proximity building analysis pipeline
#[derive(Parser, Debug)]
#[command(name = "floodline")]
#[command(about = "River-proximity building analysis pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Pipeline configuration file (TOML); defaults apply when omitted
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch OSM building footprints inside an area of interest
    Fetch(FetchArgs),

    /// Filter footprints to those within the river buffer distance
    Filter(FilterArgs),

    /// Generate tiered buffers around the filtered footprints
    Tiers(TiersArgs),

    /// Run all three stages in sequence through a working directory
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Area-of-interest vector file (GeoJSON or Shapefile)
    #[arg(long)]
    pub aoi: PathBuf,

    /// Output GeoJSON path
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// River network vector file (GeoJSON or Shapefile)
    #[arg(long)]
    pub rivers: PathBuf,

    /// Building footprints GeoJSON (output of `fetch`)
    #[arg(long)]
    pub footprints: PathBuf,

    /// Output GeoJSON path
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct TiersArgs {
    /// Filtered footprints GeoJSON (output of `filter`)
    #[arg(long)]
    pub footprints: PathBuf,

    /// Output GeoJSON path
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Area-of-interest vector file (GeoJSON or Shapefile)
    #[arg(long)]
    pub aoi: PathBuf,

    /// River network vector file (GeoJSON or Shapefile)
    #[arg(long)]
    pub rivers: PathBuf,

    /// Directory receiving the three stage outputs
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,
}
