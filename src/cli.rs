use std::{
    fs,
    path::{Path, PathBuf},
};

mod gaps;
mod report;
mod status;
mod terminal;
mod unmapped;

use anyhow::Context;
use clap::ArgAction;
use gaps::Gaps;
use report::Report;
use reqcov::{Aggregator, Config, Coverage, DataFormatError, Inputs, View, record::ActorNames};
use serde_json::Value;
use status::Status;
use unmapped::Unmapped;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Reports go to stdout, so logs must not.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Render the coverage report for one view
    Report(Report),

    /// List requirements and IERs without any test case
    Gaps(Gaps),

    /// List requirements missing from the functional mapping
    Unmapped(Unmapped),

    /// Show per-interface test case counts and gap totals
    ///
    /// Exits with code 2 when any requirement or IER is uncovered.
    Status(Status),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Report(command) => command.run(config)?,
            Self::Gaps(command) => command.run(config)?,
            Self::Unmapped(command) => command.run(config)?,
            Self::Status(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// The input files shared by every aggregating command.
#[derive(Debug, clap::Args)]
struct InputArgs {
    /// Requirement/test-case records (JSON array)
    #[arg(long, value_name = "FILE")]
    sreq: PathBuf,

    /// IER/test-case records (JSON array)
    #[arg(long, value_name = "FILE")]
    ier: PathBuf,

    /// Functional mapping records; enables the function view
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// TIN title to service lookup rows
    #[arg(long, value_name = "FILE")]
    services: Option<PathBuf>,

    /// Actor id to display name directory (JSON object)
    #[arg(long, value_name = "FILE")]
    actors: Option<PathBuf>,
}

impl InputArgs {
    /// Loads the datasets and runs every build over them.
    fn aggregate(&self, config: &Config) -> anyhow::Result<Coverage> {
        let (inputs, actors) = self.load()?;
        let aggregator = Aggregator::new(config);
        let coverage = match &actors {
            Some(names) => aggregator.with_actor_names(names).build(&inputs),
            None => aggregator.build(&inputs),
        };
        Ok(coverage)
    }

    /// Reads and parses every dataset. Any malformed file fails the run.
    fn load(&self) -> anyhow::Result<(Inputs, Option<ActorNames>)> {
        let sreq = read_json("sreq", &self.sreq)?;
        let ier = read_json("ier", &self.ier)?;
        let mapping = self
            .mapping
            .as_deref()
            .map(|path| read_json("mapping", path))
            .transpose()?;
        let services = self
            .services
            .as_deref()
            .map(|path| read_json("services", path))
            .transpose()?;

        let inputs = Inputs::from_json(sreq, ier, mapping, services)?;

        let actors = match &self.actors {
            Some(path) => Some(ActorNames::from_json(read_json("actors", path)?)?),
            None => None,
        };

        tracing::debug!(
            sreq = inputs.sreq.len(),
            ier = inputs.ier.len(),
            "loaded input datasets"
        );
        Ok((inputs, actors))
    }
}

fn read_json(dataset: &'static str, path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {dataset} records from {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|source| DataFormatError::Json { dataset, source })
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum ViewArg {
    #[default]
    Tin,
    Function,
    Ier,
}

impl From<ViewArg> for View {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Tin => Self::Tin,
            ViewArg::Function => Self::Function,
            ViewArg::Ier => Self::Ier,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
