//! skybrief CLI - Command-line preflight NOTAM briefing
//!
//! This binary provides a command-line interface to the skybrief library:
//! it wires configuration from flags and environment, runs the fetch
//! pipeline, and prints the ranked briefing to stdout.

mod error;

use clap::{Args as ClapArgs, Parser, Subcommand};
use error::CliError;
use skybrief::config::BriefingConfig;
use skybrief::credentials::Credential;
use skybrief::logging;
use skybrief::notam::ScoredNotam;
use skybrief::route::Coordinate;
use skybrief::scoring::RouteEndpoints;
use skybrief::service::BriefingService;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "skybrief")]
#[command(version = skybrief::VERSION)]
#[command(about = "Fetch and rank NOTAMs for a flight", long_about = None)]
struct Cli {
    /// API credential as ID:SECRET; repeat the flag (or comma-separate in
    /// the environment variable) to stripe requests across multiple keys
    #[arg(
        long = "credential",
        env = "SKYBRIEF_CREDENTIALS",
        value_delimiter = ',',
        required = true,
        hide_env_values = true
    )]
    credentials: Vec<String>,

    /// Advisory API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = skybrief::config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Maximum result pages fetched per waypoint
    #[arg(long, default_value_t = skybrief::config::DEFAULT_MAX_PAGES_PER_WAYPOINT)]
    max_pages: u32,

    /// Waypoint spacing along the route in nautical miles
    #[arg(long, default_value_t = skybrief::config::DEFAULT_WAYPOINT_SPACING_NM)]
    spacing_nm: f64,

    /// Query circle radius in nautical miles
    #[arg(long, default_value_t = skybrief::config::DEFAULT_QUERY_RADIUS_NM)]
    radius_nm: f64,

    /// Upstream classification filter (e.g. DOM,INTL,FDC)
    #[arg(long)]
    classification: Option<String>,

    /// Maximum advisories printed
    #[arg(long, default_value_t = 50)]
    limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Briefing for the great-circle route between two coordinates
    Route(RouteArgs),
    /// Briefing for a single airport
    Airport(AirportArgs),
}

#[derive(ClapArgs)]
struct RouteArgs {
    /// Departure latitude in decimal degrees
    #[arg(long)]
    dep_lat: f64,

    /// Departure longitude in decimal degrees
    #[arg(long)]
    dep_lon: f64,

    /// Destination latitude in decimal degrees
    #[arg(long)]
    dest_lat: f64,

    /// Destination longitude in decimal degrees
    #[arg(long)]
    dest_lon: f64,

    /// Departure ICAO code, used to boost that airport's advisories
    #[arg(long)]
    dep_code: Option<String>,

    /// Destination ICAO code, used to boost that airport's advisories
    #[arg(long)]
    dest_code: Option<String>,
}

#[derive(ClapArgs)]
struct AirportArgs {
    /// ICAO airport code (e.g. KOKC)
    code: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logging_guard =
        match logging::init_logging(logging::default_log_dir(), logging::default_log_file()) {
            Ok(guard) => guard,
            Err(e) => CliError::LoggingInit(e.to_string()).exit(),
        };

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(&cli)?;
    let service = BriefingService::new(&config)?;

    let (records, endpoints) = match &cli.command {
        Command::Route(args) => {
            let departure = Coordinate::new(args.dep_lat, args.dep_lon)
                .map_err(|e| CliError::Usage(format!("departure: {}", e)))?;
            let destination = Coordinate::new(args.dest_lat, args.dest_lon)
                .map_err(|e| CliError::Usage(format!("destination: {}", e)))?;

            let records = service.fetch_route(departure, destination).await?;
            let endpoints = RouteEndpoints::new(args.dep_code.clone(), args.dest_code.clone());
            (records, endpoints)
        }
        Command::Airport(args) => {
            let records = service.fetch_airport(&args.code).await?;
            let endpoints = RouteEndpoints::new(Some(args.code.clone()), None);
            (records, endpoints)
        }
    };

    let ranked = service.prioritize(records, &endpoints);
    tracing::info!(advisories = ranked.len(), "briefing ready");
    print_briefing(&ranked, cli.limit);
    Ok(())
}

/// Assembles the briefing configuration from flags and environment.
fn build_config(cli: &Cli) -> Result<BriefingConfig, CliError> {
    let mut credentials = Vec::with_capacity(cli.credentials.len());
    for raw in &cli.credentials {
        let (id, secret) = raw.split_once(':').ok_or_else(|| {
            CliError::Usage(format!(
                "credential {:?} is not in ID:SECRET form",
                mask(raw)
            ))
        })?;
        credentials.push(Credential::new(id, secret));
    }

    let mut config = BriefingConfig::with_credentials(credentials);
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    config.request_timeout = Duration::from_secs(cli.timeout_secs);
    config.max_pages_per_waypoint = cli.max_pages;
    config.waypoint_spacing_nm = cli.spacing_nm;
    config.query_radius_nm = cli.radius_nm;
    config.classification = cli.classification.clone();
    Ok(config)
}

/// Masks a credential string for error output.
fn mask(raw: &str) -> String {
    let visible: String = raw.chars().take(4).collect();
    format!("{}…", visible)
}

/// Prints the ranked briefing, one advisory per line.
fn print_briefing(ranked: &[ScoredNotam], limit: usize) {
    if ranked.is_empty() {
        println!("No advisories found.");
        return;
    }

    println!(
        "{:>4}  {:>6}  {:<9} {:<8} {:<5} TEXT",
        "RANK", "SCORE", "CATEGORY", "NUMBER", "LOC"
    );
    for (rank, scored) in ranked.iter().take(limit).enumerate() {
        let record = &scored.record;
        println!(
            "{:>4}  {:>6.1}  {:<9} {:<8} {:<5} {}",
            rank + 1,
            scored.score,
            record.category.to_string(),
            record.number,
            record.location.as_deref().unwrap_or("-"),
            first_line(&record.text, 80),
        );
    }

    if ranked.len() > limit {
        println!("… {} more advisories suppressed (--limit)", ranked.len() - limit);
    }
}

/// First line of the advisory text, truncated for the table.
fn first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max_chars {
        line.to_string()
    } else {
        let truncated: String = line.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}
