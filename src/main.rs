use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use podium::config::Config;
use podium::export::{self, ResultsReport};
use podium::scoring::{PointsConfig, ResultTable, TieGroups};
use podium::Table;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute results and print them with tie information
    Compute(ComputeArgs),
    /// Compute results and write {event}_results.csv
    Export(ExportArgs),
    /// Leaderboard of points summed across exported results
    Standings(StandingsArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// CSV file with participant ids and marks
    #[arg(short, long)]
    marks: PathBuf,

    /// CSV file with participant details, joined on the participant id
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Points for 1st place (overrides config)
    #[arg(long)]
    first: Option<f64>,

    /// Points for 2nd place (overrides config)
    #[arg(long)]
    second: Option<f64>,

    /// Points for 3rd place (overrides config)
    #[arg(long)]
    third: Option<f64>,
}

#[derive(Args, Debug)]
struct ComputeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Event name, used for the output file name
    #[arg(short, long, default_value = "")]
    event: String,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write {event}_results.json
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct StandingsArgs {
    /// Exported results CSV files (concatenated before grouping)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Column(s) to group by, e.g. "Church" or "Chest No" "Name"
    #[arg(short, long, required = true, num_args = 1..)]
    by: Vec<String>,

    /// Number of groups to show
    #[arg(short, long, default_value_t = 5)]
    top: usize,

    /// Extra column(s) whose distinct values are counted in the summary
    #[arg(long, num_args = 1..)]
    count: Vec<String>,

    /// Event name; when given, write {event}_{category}_results.csv and _summary.csv
    #[arg(short, long)]
    event: Option<String>,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "Event results calculator: totals, ranks, podium points and ties", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/podium/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Log to stderr. RUST_LOG wins over --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("podium={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match podium::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = !cli.no_color && podium::output::should_use_colors();

    let outcome = match cli.command {
        Commands::Compute(args) => {
            let points = effective_points(&config, &args.input);
            validate_or_exit(&config, &points);
            run_compute(&config, &points, &args, use_colors)
        }
        Commands::Export(args) => {
            let points = effective_points(&config, &args.input);
            validate_or_exit(&config, &points);
            run_export(&config, &points, &args)
        }
        Commands::Standings(args) => run_standings(&args, use_colors),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

fn effective_points(config: &Config, input: &InputArgs) -> PointsConfig {
    PointsConfig {
        first: input.first.unwrap_or(config.points.first),
        second: input.second.unwrap_or(config.points.second),
        third: input.third.unwrap_or(config.points.third),
    }
}

/// Validate scoring config at startup
fn validate_or_exit(config: &Config, points: &PointsConfig) {
    if let Err(errors) = podium::scoring::validate_scoring(points, &config.columns) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
}

struct Computed {
    results: ResultTable,
    ties: TieGroups,
    /// Roster rows enriched with results, when a roster was given.
    merged: Option<Table>,
}

impl Computed {
    /// The table to show or export: the merged one if present.
    fn table(&self) -> Table {
        self.merged
            .clone()
            .unwrap_or_else(|| self.results.to_table())
    }

    fn report<'a>(&'a self, event: &'a str, points: &'a PointsConfig) -> ResultsReport<'a> {
        ResultsReport {
            event,
            points,
            results: &self.results,
            ties: &self.ties,
            merged: self.merged.as_ref(),
        }
    }
}

/// Load marks, compute results, and merge onto the roster when one is given.
fn compute_tables(config: &Config, points: &PointsConfig, input: &InputArgs) -> Result<Computed> {
    let marks = podium::ingest::read_table(&input.marks)?;
    let (results, ties) = podium::compute_results(&marks, &config.columns, points)
        .with_context(|| format!("Failed to compute results from {}", input.marks.display()))?;

    let merged = match &input.roster {
        Some(roster_path) => {
            let roster = podium::ingest::read_table(roster_path)?;
            let merged = podium::merge_with_roster(
                &results.to_table(),
                &roster,
                &config.columns.participant_id,
            )
            .with_context(|| format!("Failed to merge with roster {}", roster_path.display()))?;
            Some(merged)
        }
        None => None,
    };
    Ok(Computed {
        results,
        ties,
        merged,
    })
}

fn run_compute(
    config: &Config,
    points: &PointsConfig,
    args: &ComputeArgs,
    use_colors: bool,
) -> Result<()> {
    let computed = compute_tables(config, points, &args.input)?;

    match args.format {
        OutputFormat::Table => {
            let table = computed.table();
            println!("{}", podium::output::format_tie_report(&computed.ties, use_colors));
            println!();
            println!("{}", podium::output::format_table(&table, use_colors));
            println!();
            println!("{}", podium::output::format_points_summary(points));
        }
        OutputFormat::Tsv => {
            println!("{}", podium::output::format_tsv(&computed.table()));
        }
        OutputFormat::Json => {
            let report = computed.report("", points);
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize results")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_export(config: &Config, points: &PointsConfig, args: &ExportArgs) -> Result<()> {
    // Reject before doing any work
    let csv_path = export::export_path(&args.out_dir, &args.event, "csv")
        .context("Please enter an event name before exporting")?;

    let computed = compute_tables(config, points, &args.input)?;
    if !computed.ties.is_empty() {
        eprintln!("{}", podium::output::format_tie_report(&computed.ties, false));
    }

    let table = computed.table();
    export::write_csv(&csv_path, &table)?;
    println!("Wrote {} rows to {}", table.len(), csv_path.display());

    if args.json {
        let json_path = export::export_path(&args.out_dir, &args.event, "json")?;
        export::write_json(&json_path, &computed.report(args.event.trim(), points))?;
        println!("Wrote {}", json_path.display());
    }
    Ok(())
}

fn run_standings(args: &StandingsArgs, use_colors: bool) -> Result<()> {
    // Reject before doing any work
    let export_paths = match &args.event {
        Some(event) => Some(
            export::standings_export_paths(&args.out_dir, event, &args.by)
                .context("Please enter an event name before exporting")?,
        ),
        None => None,
    };

    let combined = load_combined(&args.input)?;
    let mut standings = podium::standings::compute_standings(&combined, &args.by)
        .context("Failed to compute standings")?;
    standings
        .distinct
        .extend(podium::standings::count_distinct(&combined, &args.count)?);
    println!(
        "{}",
        podium::output::format_standings(&standings, args.top, use_colors)
    );

    if let Some((results_path, summary_path)) = export_paths {
        let top = standings.to_table(args.top);
        export::write_csv(&results_path, &top)?;
        println!("Wrote {} rows to {}", top.len(), results_path.display());
        export::write_csv(&summary_path, &standings.summary().to_table())?;
        println!("Wrote {}", summary_path.display());
    }
    Ok(())
}

fn load_combined(paths: &[PathBuf]) -> Result<Table> {
    let mut combined: Option<Table> = None;
    for path in paths {
        let table = podium::ingest::read_table(path)?;
        match combined.as_mut() {
            Some(all) => all.append(&table),
            None => combined = Some(table),
        }
    }
    combined.context("No input files given")
}
