use anyhow::bail;
use chunk_tail::utils::config::LoggingConfig;
use chunk_tail::{parse_date, AppConfig, EngineConfig, Operation, TransformEngine};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Text/CSV tool: tail, drop-last, intervals, column analysis, date filtering
/// and numeric sums, with periodic checkpoints of the output file.
#[derive(Parser, Debug)]
#[command(name = "chunk-tail", version, about)]
#[command(group(
    ArgGroup::new("mode").args([
        "tail",
        "drop_last",
        "interval",
        "delete_interval",
        "analyze",
        "filter_date",
        "count",
        "sum_lines",
        "add_files",
    ])
))]
struct Cli {
    /// Input file (text or CSV)
    input: PathBuf,

    /// Number of lines for --tail (backward compatibility)
    #[arg(conflicts_with = "mode")]
    number: Option<usize>,

    /// Output file [default: output.default_path from the config, "result.txt"]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First line + last N lines
    #[arg(long, value_name = "N")]
    tail: Option<usize>,

    /// First line + everything except the last N lines
    #[arg(long, value_name = "N")]
    drop_last: Option<usize>,

    /// First line + lines START..=END (line 1 is the header)
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    interval: Option<Vec<usize>>,

    /// First line + every line outside START..=END
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    delete_interval: Option<Vec<usize>>,

    /// Infer column types from the CSV header and first sample rows
    #[arg(long)]
    analyze: bool,

    /// CSV header + rows where COLUMN holds a date within START..=END
    #[arg(long, num_args = 3, value_names = ["COLUMN", "START", "END"])]
    filter_date: Option<Vec<String>>,

    /// Count lines, header included
    #[arg(long)]
    count: bool,

    /// Sum every numeric line
    #[arg(long)]
    sum_lines: bool,

    /// Add OTHER to the input line by line
    #[arg(long, value_name = "OTHER")]
    add_files: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (TOML)
    #[arg(long, default_value = "chunk-tail.toml")]
    config: String,

    /// Records between checkpoints (overrides the config file)
    #[arg(long, value_name = "N")]
    checkpoint_interval: Option<usize>,
}

impl Cli {
    fn operation(&self) -> anyhow::Result<Operation> {
        let operation = if let Some(n) = self.tail.or(self.number) {
            Operation::Tail { n }
        } else if let Some(n) = self.drop_last {
            Operation::DropLast { n }
        } else if let Some(bounds) = &self.interval {
            let (start, end) = pair(bounds)?;
            Operation::Interval { start, end }
        } else if let Some(bounds) = &self.delete_interval {
            let (start, end) = pair(bounds)?;
            Operation::DeleteInterval { start, end }
        } else if self.analyze {
            Operation::Analyze
        } else if let Some(args) = &self.filter_date {
            match args.as_slice() {
                [column, start, end] => Operation::FilterDate {
                    column: column.clone(),
                    start: parse_date(start)?,
                    end: parse_date(end)?,
                },
                _ => bail!("--filter-date takes COLUMN START END"),
            }
        } else if self.count {
            Operation::Count
        } else if self.sum_lines {
            Operation::SumLines
        } else if let Some(other) = &self.add_files {
            Operation::AddFiles {
                other: other.clone(),
            }
        } else {
            bail!(
                "specify one of the modes: --tail, --drop-last, --interval, --delete-interval, \
                 --analyze, --filter-date, --count, --sum-lines or --add-files"
            );
        };
        operation.validate()?;
        Ok(operation)
    }
}

fn pair(bounds: &[usize]) -> anyhow::Result<(usize, usize)> {
    match bounds {
        [start, end] => Ok((*start, *end)),
        _ => bail!("expected START END"),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chunk_tail={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut config, config_error) = AppConfig::load_or_default(&cli.config);
    init_tracing(&config.logging);
    if let Some(e) = config_error {
        tracing::warn!(path = %cli.config, error = %e, "Ignoring config file, using defaults");
    }
    if let Some(interval) = cli.checkpoint_interval {
        config.checkpoint.interval = interval;
    }

    let operation = cli.operation()?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output.default_path.clone());

    let engine = TransformEngine::new(EngineConfig::from_app_config(&config)?);
    let report = engine.run(&operation, &cli.input, &output)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
