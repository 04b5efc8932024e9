mod cli;

use clap::Parser;
use saferoute::catalog::json_file::JsonFileStore;
use saferoute::config;
use saferoute::exit_code;
use saferoute::report;
use saferoute::types::config::SafeRouteConfig;
use saferoute::types::report::{
    ComparisonReport, Output, RouteDetail, RoutePage, RouteSummary, UpsertSummary,
};
use saferoute::{ListQuery, Result, RouteCatalog, RouteComparator, SafeRouteError, UpsertRequest};
use serde_json::Value;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_env("SAFEROUTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("saferoute={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open_catalog(cli: &cli::Cli) -> Result<(RouteCatalog<JsonFileStore>, SafeRouteConfig)> {
    let loaded = config::load_config(&cli.root)?;
    if loaded.applied.is_empty() {
        debug!(root = %cli.root.display(), "no config files found, using defaults");
    }
    for (layer, path) in &loaded.applied {
        debug!(layer = layer.as_str(), path = %path.display(), "applied config layer");
    }
    let cfg = loaded.config;
    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| cfg.store_path(&cli.root));
    let store = JsonFileStore::open(store_path)?;
    let catalog = RouteCatalog::new(store, cfg.weights());
    debug!(
        store = %catalog.store().path().display(),
        weights = ?catalog.weights(),
        "catalog ready"
    );
    Ok((catalog, cfg))
}

fn upsert_request(cmd: &cli::UpsertCommand) -> Result<UpsertRequest> {
    if let Some(path) = &cmd.payload {
        let raw = if path.as_os_str() == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            std::fs::read_to_string(path)?
        };
        return serde_json::from_str(&raw)
            .map_err(|e| SafeRouteError::validation("payload", e.to_string()));
    }

    Ok(UpsertRequest {
        route_id: cmd.route_id.clone(),
        source: cmd.source.clone(),
        destination: cmd.destination.clone(),
        traffic_score: cmd.traffic_score.as_deref().map(score_value),
        crime_score: cmd.crime_score.as_deref().map(score_value),
        weather_score: cmd.weather_score.as_deref().map(score_value),
        source_coords: json_arg("source_coords", cmd.source_coords.as_deref())?,
        destination_coords: json_arg("destination_coords", cmd.destination_coords.as_deref())?,
        route_geometry: json_arg("route_geometry", cmd.route_geometry.as_deref())?,
    })
}

/// Numbers become JSON numbers; anything else stays text and fails validation.
fn score_value(raw: &str) -> Value {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn json_arg(field: &str, raw: Option<&str>) -> Result<Option<Value>> {
    raw.map(|text| {
        serde_json::from_str(text)
            .map_err(|e| SafeRouteError::validation(field, format!("not valid JSON: {e}")))
    })
    .transpose()
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    debug!("saferoute v{}", env!("CARGO_PKG_VERSION"));

    let (catalog, cfg) = open_catalog(&cli)?;
    let output = match &cli.command {
        cli::Commands::Upsert(cmd) => {
            let request = upsert_request(cmd)?;
            let outcome = catalog.upsert(&request, None)?;
            Output::Upsert(UpsertSummary {
                route_id: outcome.route.route_id().to_string(),
                final_score: outcome.route.final_score(),
                created: outcome.created,
            })
        }
        cli::Commands::Get(cmd) => {
            let route = catalog.get(&cmd.route_id)?;
            Output::Detail(Box::new(RouteDetail::from(&route)))
        }
        cli::Commands::List(cmd) => {
            let limit = cmd.limit.unwrap_or_else(|| cfg.default_limit());
            let query = ListQuery {
                active_only: !cmd.include_inactive,
                ..ListQuery::page(cmd.page, limit)?
            };
            let routes = catalog.list(&query)?;
            Output::Page(RoutePage {
                page: cmd.page,
                limit,
                routes: routes.iter().map(RouteSummary::from).collect(),
            })
        }
        cli::Commands::Compare(cmd) => {
            let comparison =
                RouteComparator::new(&catalog).compare(&cmd.source, &cmd.destination)?;
            Output::Comparison(ComparisonReport::from(&comparison))
        }
        cli::Commands::Deactivate(cmd) => {
            let route = catalog.deactivate(&cmd.route_id)?;
            Output::Detail(Box::new(RouteDetail::from(&route)))
        }
    };

    if !cli.quiet {
        let format = match cli.format {
            cli::ReportFormat::Json => report::OutputFormat::Json,
            cli::ReportFormat::Md => report::OutputFormat::Md,
        };
        println!("{}", report::render(&output, format)?);
    }
    Ok(exit_code::SUCCESS)
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
