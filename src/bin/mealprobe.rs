use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mealprobe::client::ApiClient;
use mealprobe::config::HarnessConfig;
use mealprobe::fixtures::FixtureSet;
use mealprobe::{populate, query, verify};

#[derive(Parser, Debug)]
#[command(
    name = "mealprobe",
    about = "Fixture loader and verification harness for the meals/diets API"
)]
struct Cli {
    /// Path to a JSON config file (defaults apply when absent)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the meals service base URL
    #[arg(long)]
    meals_base: Option<String>,
    /// Override the diets service base URL
    #[arg(long)]
    diets_base: Option<String>,
    /// Override the per-request timeout (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the fixture catalog into the remote store (best effort)
    Populate {
        /// JSON fixture set to load instead of the built-in catalog
        #[arg(long)]
        fixtures: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
    /// Run the verification scenarios and report pass/fail
    Verify {
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
        /// Destination file for the JSON report
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the file-driven query script
    Query {
        /// Input file with one dish name per line
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output file receiving one formatted line per name
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the active fixture catalog as JSON
    DumpFixtures {
        /// JSON fixture set to print instead of the built-in catalog
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Json,
    Table,
}

fn main() -> ExitCode {
    mealprobe::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("mealprobe error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(execute(cli.command, config))
}

fn resolve_config(cli: &Cli) -> HarnessConfig {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load_from_file(path),
        None => HarnessConfig::default(),
    };

    if let Some(base) = &cli.meals_base {
        config.endpoints.meals_base = base.clone();
    }
    if let Some(base) = &cli.diets_base {
        config.endpoints.diets_base = base.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.http.timeout_ms = timeout_ms;
    }
    config
}

async fn execute(command: Commands, config: HarnessConfig) -> Result<ExitCode> {
    match command {
        Commands::Populate { fixtures, format } => {
            let client = ApiClient::new(&config)?;
            let set = load_fixtures(fixtures)?;
            let report = populate::run(&client, &set).await?;
            match format {
                ReportFormat::Json => report.print_json()?,
                ReportFormat::Table => report.print_table(),
            }
            Ok(ExitCode::from(0))
        }
        Commands::Verify { format, output } => {
            let client = ApiClient::new(&config)?;
            let report = verify::run(&client).await;

            if let Some(path) = output {
                let json = report.to_json()?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
            } else {
                match format {
                    ReportFormat::Json => report.print_json()?,
                    ReportFormat::Table => report.print_table(),
                }
            }

            Ok(ExitCode::from(report.exit_code()))
        }
        Commands::Query { input, output } => {
            let client = ApiClient::new(&config)?;
            let input = input.unwrap_or_else(|| PathBuf::from(&config.files.query_path));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.files.response_path));
            let report = query::run(&client, &input, &output).await?;
            println!(
                "Wrote {} lines to {} ({} degraded lookups)",
                report.lines_written,
                output.display(),
                report.lookups_degraded
            );
            Ok(ExitCode::from(0))
        }
        Commands::DumpFixtures { fixtures } => {
            let set = load_fixtures(fixtures)?;
            println!("{}", serde_json::to_string_pretty(&set)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn load_fixtures(path: Option<PathBuf>) -> Result<FixtureSet> {
    match path {
        Some(path) => FixtureSet::load_from_file(&path)
            .with_context(|| format!("loading fixtures from {}", path.display())),
        None => Ok(FixtureSet::builtin()),
    }
}
