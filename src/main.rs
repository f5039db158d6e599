use anyhow::Context;
use clap::{Parser, Subcommand};
use insightx::{Action, ExploreConfig, Operator, RoleField, Service, Session, Table};
use insightx_explore::Summary;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Visual insight recommendation for tabular data
#[derive(Parser, Debug)]
#[command(name = "insightx")]
#[command(about = "Rank data subspaces and recommend chart specifications", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one JSON request (`-` reads stdin)
    Run {
        request: PathBuf,
    },

    /// Summarize, search and build views for a data file
    Explore {
        /// JSON array of row objects
        #[arg(short, long)]
        data: PathBuf,

        /// Dimension fields
        #[arg(long, value_delimiter = ',', required = true)]
        dimensions: Vec<String>,

        /// Measure fields
        #[arg(long, value_delimiter = ',', required = true)]
        measures: Vec<String>,

        /// Aggregation operator: sum, mean or count
        #[arg(long, default_value = "sum")]
        operator: String,

        /// Fraction of ranked subspaces kept
        #[arg(long, default_value_t = 0.3)]
        subspace_percent_size: f64,

        /// Fraction of entropy-ordered dimensions searched
        #[arg(long, default_value_t = 0.72)]
        dimension_size: f64,

        /// Fields with more distinct values are grouped
        #[arg(long, default_value_t = 4)]
        max_group_number: usize,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExploreReport<'a> {
    summary: &'a Summary,
    dimensions: Vec<String>,
    measures: Vec<String>,
    subspaces: &'a [insightx::Subspace],
    views: &'a [insightx::View],
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting InsightX v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Run { request } => {
            let body = read_input(&request)?;
            let response = Service::default()
                .handle_json(&body)
                .context("failed to render response")?;
            if args.pretty {
                let value: serde_json::Value = serde_json::from_str(&response)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", response);
            }
        }

        Command::Explore {
            data,
            dimensions,
            measures,
            operator,
            subspace_percent_size,
            dimension_size,
            max_group_number,
        } => {
            let operator: Operator = serde_json::from_value(serde_json::Value::String(operator.clone()))
                .with_context(|| format!("unknown operator '{}'", operator))?;
            let table = Table::from_json(serde_json::from_str(&read_input(&data)?)?)
                .context("data must be a JSON array of objects")?;
            info!("Loaded {} rows from {:?}", table.len(), data);

            let fields: Vec<RoleField> = dimensions
                .iter()
                .map(RoleField::dimension)
                .chain(measures.iter().map(RoleField::measure))
                .collect();

            let session = Session::new(ExploreConfig {
                subspace_percent_size,
                dimension_size,
                max_group_number,
            })?;
            session.dispatch(Action::LoadData {
                data_source: table,
                fields,
            })?;
            let state = session.dispatch(Action::ExtractInsights { operator })?;

            let report = ExploreReport {
                summary: &state.summary,
                dimensions: state.dimension_names(),
                measures: state.measure_names(),
                subspaces: &state.subspace_list,
                views: &state.view_spaces,
            };
            println!("{}", to_json(&report, args.pretty)?);
        }
    }

    Ok(())
}
