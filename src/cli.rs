use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "saferoute",
    version,
    about = "Route risk scoring catalog and comparison CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding saferoute.toml and the default route store
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Route store file, overriding store.path from config
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[arg(short, long, value_enum, global = true, default_value = "json")]
    pub format: ReportFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Upsert(UpsertCommand),
    Get(GetCommand),
    List(ListCommand),
    Compare(CompareCommand),
    Deactivate(DeactivateCommand),
}

/// Create a route or update the one with the same id
#[derive(Args)]
pub struct UpsertCommand {
    /// JSON payload file, or `-` for stdin
    #[arg(
        long,
        conflicts_with_all = [
            "route_id",
            "source",
            "destination",
            "traffic_score",
            "crime_score",
            "weather_score",
            "source_coords",
            "destination_coords",
            "route_geometry",
        ]
    )]
    pub payload: Option<PathBuf>,

    #[arg(long)]
    pub route_id: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub traffic_score: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub crime_score: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub weather_score: Option<String>,

    /// `[lng, lat]`
    #[arg(long, allow_hyphen_values = true)]
    pub source_coords: Option<String>,
    /// `[lng, lat]`
    #[arg(long, allow_hyphen_values = true)]
    pub destination_coords: Option<String>,
    /// `[[lng, lat], ...]` with at least two points
    #[arg(long, allow_hyphen_values = true)]
    pub route_geometry: Option<String>,
}

/// Show one route, active or not
#[derive(Args)]
pub struct GetCommand {
    pub route_id: String,
}

/// List active routes, newest first
#[derive(Args)]
pub struct ListCommand {
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Page size; defaults to listing.default_limit
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub include_inactive: bool,
}

/// Rank active routes between two places by risk
#[derive(Args)]
pub struct CompareCommand {
    #[arg(long)]
    pub source: String,
    #[arg(long)]
    pub destination: String,
}

/// Hide a route from listings and comparisons
#[derive(Args)]
pub struct DeactivateCommand {
    pub route_id: String,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
