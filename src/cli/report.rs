use clap::Parser;
use reqcov::{Config, Outline, View, render};
use tracing::instrument;

use super::{InputArgs, OutputFormat, ViewArg};

#[derive(Debug, Parser)]
#[command(about = "Render the coverage report for one view")]
pub struct Report {
    #[command(flatten)]
    inputs: InputArgs,

    /// Which hierarchy to render
    #[arg(long, value_name = "VIEW", default_value = "tin")]
    view: ViewArg,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    output: OutputFormat,
}

impl Report {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let view = View::from(self.view);
        if view == View::Function && self.inputs.mapping.is_none() {
            tracing::warn!("no functional mapping given; the function view will be empty");
        }

        let coverage = self.inputs.aggregate(config)?;

        match self.output {
            OutputFormat::Markdown => {
                print!("{}", render::render_coverage(&coverage.root, view));
            }
            OutputFormat::Json => {
                let outline = Outline::build(&coverage.root, view);
                println!("{}", serde_json::to_string_pretty(&outline)?);
            }
        }
        Ok(())
    }
}
