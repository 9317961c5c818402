//! CLI entry point for the bike-share report tool.
//!
//! Provides subcommands for running the full synthetic report (tables,
//! optional CSV/JSON exports, chart image) and for dumping raw synthetic
//! trips to CSV.

use anyhow::Result;
use bikeshare_report::analyzers::aggregate::Aggregates;
use bikeshare_report::analyzers::heatmap::HeatmapMatrix;
use bikeshare_report::analyzers::score::rank_by_rush_score;
use bikeshare_report::{
    config::{DEFAULT_COUNT, DEFAULT_SEED, ReportConfig},
    features::derive_features,
    output::{ReportSummary, print_table, write_csv, write_json, write_trips_csv},
    render::render_report,
    trips::TripGenerator,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_report")]
#[command(about = "Generate synthetic bike-share trips and report on them", long_about = None)]
struct Cli {
    /// Defaults to `report` with default parameters
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate trips, print station rankings and draw the charts
    Report(ReportArgs),
    /// Write synthetic trips with their derived fields to CSV
    Generate {
        /// Number of synthetic trips to generate
        #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
        count: usize,

        /// Random seed
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// CSV file to write
        #[arg(short, long, default_value = "trips.csv")]
        output: PathBuf,
    },
}

#[derive(Args, Default)]
struct ReportArgs {
    /// JSON file with run parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of synthetic trips to generate
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rows shown in each ranking
    #[arg(short = 'k', long)]
    top: Option<usize>,

    /// PNG file to write the charts to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional: directory to write stations.csv, hourly.csv and day_hour.csv
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Optional: file to write a JSON summary to
    #[arg(long)]
    json: Option<PathBuf>,
}

impl ReportArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve(&self) -> Result<ReportConfig> {
        let mut cfg = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        };
        if let Some(count) = self.count {
            cfg.count = count;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(top) = self.top {
            cfg.top_k = top;
        }
        if let Some(output) = &self.output {
            cfg.output = output.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli
        .command
        .unwrap_or_else(|| Commands::Report(ReportArgs::default()))
    {
        Commands::Report(args) => {
            let cfg = args.resolve()?;
            run_report(&cfg, args.csv_dir.as_deref(), args.json.as_deref())?;
        }
        Commands::Generate {
            count,
            seed,
            output,
        } => {
            let trips = TripGenerator::new(seed)?.generate(count)?;
            let features = derive_features(&trips);
            write_trips_csv(&output, &features)?;

            info!(count, seed, output = %output.display(), "Trips written");
        }
    }

    Ok(())
}

/// Runs generation, aggregation, ranking and rendering for one config.
#[tracing::instrument(skip_all, fields(count = cfg.count, seed = cfg.seed))]
fn run_report(cfg: &ReportConfig, csv_dir: Option<&Path>, json: Option<&Path>) -> Result<()> {
    let started = Instant::now();

    let trips = TripGenerator::new(cfg.seed)?.generate(cfg.count)?;
    info!(
        trips = trips.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Trips generated"
    );

    let features = derive_features(&trips);
    let aggregates = Aggregates::compute(&features);
    let heatmap = HeatmapMatrix::from_day_hour(&aggregates.day_hour);
    let ranked = rank_by_rush_score(&aggregates.stations)?;
    debug!(
        hours = heatmap.hours.len(),
        heatmap_total = heatmap.total(),
        "Heatmap pivoted"
    );

    let mut stdout = std::io::stdout().lock();
    print_table(
        &mut stdout,
        &format!("Top {} stations by trips", cfg.top_k),
        &aggregates.stations,
        cfg.top_k,
        false,
    )?;
    print_table(
        &mut stdout,
        &format!("Top {} stations by rush score", cfg.top_k),
        &ranked,
        cfg.top_k,
        true,
    )?;

    if let Some(dir) = csv_dir {
        std::fs::create_dir_all(dir)?;
        write_csv(dir.join("stations.csv"), &ranked)?;
        write_csv(dir.join("hourly.csv"), &aggregates.hourly)?;
        write_csv(dir.join("day_hour.csv"), &aggregates.day_hour)?;
        info!(dir = %dir.display(), "Aggregates exported");
    }

    if let Some(path) = json {
        let summary = ReportSummary::new(
            cfg.count,
            cfg.seed,
            &aggregates.stations,
            &ranked,
            cfg.top_k,
        );
        write_json(path, &summary)?;
        info!(path = %path.display(), "Summary written");
    }

    render_report(&cfg.output, &aggregates.hourly, &heatmap)?;

    info!(
        output = %cfg.output.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Report complete"
    );
    Ok(())
}
