use std::path::PathBuf;

use clap::Parser;
use reqcov::{
    Aggregator, Config,
    classify::IerTestCaseIndex,
    record::{FunctionalMapping, MappingRecord, SreqRecord, parse_records},
    render,
};
use tracing::instrument;

use super::{OutputFormat, read_json};

#[derive(Debug, Parser)]
#[command(about = "List requirements missing from the functional mapping")]
pub struct Unmapped {
    /// Requirement/test-case records (JSON array)
    #[arg(long, value_name = "FILE")]
    sreq: PathBuf,

    /// Functional mapping records (JSON array)
    #[arg(long, value_name = "FILE")]
    mapping: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    output: OutputFormat,
}

impl Unmapped {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let records: Vec<SreqRecord> = parse_records("sreq", read_json("sreq", &self.sreq)?)?;
        let rows: Vec<MappingRecord> =
            parse_records("mapping", read_json("mapping", &self.mapping)?)?;

        let mapping = FunctionalMapping::from_records(&rows);
        let view = Aggregator::new(config).build_by_function(
            &records,
            &mapping,
            &IerTestCaseIndex::default(),
        );

        match self.output {
            OutputFormat::Markdown => {
                if view.unmapped.is_empty() {
                    eprintln!("Every requirement has a functional mapping.");
                    return Ok(());
                }
                print!("{}", render::render_unmapped(&view.unmapped));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&view.unmapped)?);
            }
        }
        Ok(())
    }
}
