//! Switchboard CLI
//!
//! Loads a CSV of call records and answers queries against it:
//! - Show dataset diagnostics
//! - List indexed agents and the available date range
//! - Run agent and period queries

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard::{parse_query, read_grid, AnalyticsEngine, Config, QueryResponse};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "In-memory analytics over call-center records")]
struct Cli {
    /// CSV file with call records (first row = headers)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Config file path (defaults to the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(long, default_value = "table", global = true)]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset and cache diagnostics
    Info,
    /// List the distinct agents in the dataset
    Agents,
    /// Show the earliest and latest call dates
    Periods,
    /// Run a query, e.g. 'agent "Ana" from 2024-01-01 to 2024-01-31'
    Query {
        /// Query string
        query: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("switchboard={}", config.logging.level).into())
    };
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let file = cli.file.context("--file <CSV> is required")?;
    let read = read_grid(&file).with_context(|| format!("failed to read {}", file.display()))?;
    if read.records_failed > 0 {
        tracing::warn!(
            failed = read.records_failed,
            "some CSV records could not be read"
        );
        for error in &read.errors {
            tracing::warn!("{error}");
        }
    }

    let mut engine = AnalyticsEngine::with_config(config.engine.clone());
    let report = engine.ingest(&read.grid);
    tracing::info!(
        rows = report.rows_loaded,
        skipped_dates = report.rows_without_date,
        "dataset loaded"
    );

    let json = cli.format == "json";
    match cli.command {
        Commands::Info => {
            let info = engine.info();
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("loaded:        {}", info.loaded);
                println!("rows:          {}", info.row_count);
                println!("generation:    {}", info.generation);
                println!("agents:        {}", info.index_stats.agents);
                println!("days:          {}", info.index_stats.days);
                println!("statuses:      {}", info.index_stats.statuses);
                println!("queues:        {}", info.index_stats.queues);
                println!("cache entries: {}", info.cache_entries);
            }
        }
        Commands::Agents => {
            let agents = engine.available_agents();
            if json {
                println!("{}", serde_json::to_string_pretty(&agents)?);
            } else {
                for agent in agents {
                    println!("{agent}");
                }
            }
        }
        Commands::Periods => match engine.available_periods() {
            Some((start, end)) => {
                if json {
                    println!("{}", serde_json::json!({ "start": start, "end": end }));
                } else {
                    println!("{start} .. {end}");
                }
            }
            None => println!("no dated rows in dataset"),
        },
        Commands::Query { query } => {
            let descriptor = parse_query(&query)?;
            let response = engine.query(&descriptor)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_response(&response);
            }
        }
    }

    Ok(())
}

fn print_response(response: &QueryResponse) {
    let metrics = &response.metrics;

    println!("records:            {}", response.summary.record_count);
    if let Some(period) = &response.summary.period {
        println!("period:             {} .. {}", period.start, period.end);
    }
    println!("total calls:        {}", metrics.total_calls);
    println!("total duration:     {} s", metrics.total_duration_secs);
    println!("attended:           {}", metrics.attended);
    println!("abandoned:          {}", metrics.abandoned);
    println!("mean attended dur:  {:.1} s", metrics.mean_attended_duration_secs);
    println!("mean satisfaction:  {:.2}", metrics.mean_satisfaction);

    if !metrics.status_counts.is_empty() {
        println!("\nby status:");
        let mut statuses: Vec<_> = metrics.status_counts.iter().collect();
        statuses.sort();
        for (status, count) in statuses {
            println!("  {status:<20} {count:>6}");
        }
    }

    if !metrics.daily.is_empty() {
        println!("\nper day:");
        for (date, day) in &metrics.daily {
            println!("  {date}  {:>6} calls  {:>8} s", day.calls, day.duration_secs);
        }
    }

    if let Some(agents) = &metrics.by_agent {
        println!("\nper agent:");
        for (agent, activity) in agents {
            println!(
                "  {agent:<20} {:>6} calls  {:>8} s  {:.2}",
                activity.calls, activity.duration_secs, activity.mean_satisfaction
            );
        }
    }
}
