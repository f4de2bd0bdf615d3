use clap::Parser;
use reqcov::{Config, Outline, View, render};
use tracing::instrument;

use super::{InputArgs, OutputFormat, ViewArg};

#[derive(Debug, Parser)]
#[command(about = "List requirements and IERs without any test case")]
pub struct Gaps {
    #[command(flatten)]
    inputs: InputArgs,

    /// Which hierarchy to check
    #[arg(long, value_name = "VIEW", default_value = "tin")]
    view: ViewArg,

    /// Truncate names to this many characters (overrides the config)
    #[arg(long, value_name = "CHARS")]
    width: Option<usize>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    output: OutputFormat,
}

impl Gaps {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let view = View::from(self.view);
        let width = self.width.unwrap_or(config.gap_name_width);
        let coverage = self.inputs.aggregate(config)?;

        match self.output {
            OutputFormat::Markdown => {
                let report = render::render_gaps(&coverage.root, view, width);
                if report.is_empty() {
                    eprintln!("No coverage gaps found.");
                }
                print!("{report}");
            }
            OutputFormat::Json => {
                let outline = Outline::build(&coverage.root.uncovered(), view);
                println!("{}", serde_json::to_string_pretty(&outline)?);
            }
        }
        Ok(())
    }
}
