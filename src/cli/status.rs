use std::process;

use clap::Parser;
use reqcov::{
    Config, Outline, View,
    render::{NodeKind, OutlineNode},
};
use serde::Serialize;
use tracing::instrument;

use super::{
    InputArgs,
    terminal::{Colorize, is_narrow},
};

#[derive(Debug, Parser)]
#[command(about = "Show per-interface test case counts and gap totals")]
pub struct Status {
    #[command(flatten)]
    inputs: InputArgs,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Counts for one top-level interface (SI or PI) in one view.
#[derive(Debug, Serialize)]
struct Row {
    view: View,
    key: String,
    name: String,
    test_cases: usize,
    gaps: usize,
}

impl Row {
    fn new(view: View, node: &OutlineNode) -> Self {
        let gaps = node
            .walk()
            .filter(|node| {
                node.zero_count
                    && matches!(
                        node.kind,
                        NodeKind::Requirement | NodeKind::ExchangeRequirement
                    )
            })
            .count();
        Self {
            view,
            key: node.key.clone(),
            name: node.name.clone(),
            test_cases: node.count,
            gaps,
        }
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.key.clone()
        } else {
            format!("{} {}", self.key, self.name)
        }
    }
}

const fn view_name(view: View) -> &'static str {
    match view {
        View::Tin => "tin",
        View::Function => "function",
        View::Ier => "ier",
    }
}

impl Status {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let coverage = self.inputs.aggregate(config)?;

        let rows: Vec<Row> = [View::Tin, View::Function, View::Ier]
            .into_iter()
            .flat_map(|view| {
                Outline::build(&coverage.root, view)
                    .nodes
                    .iter()
                    .map(|node| Row::new(view, node))
                    .collect::<Vec<_>>()
            })
            .collect();

        if rows.is_empty() {
            println!("No coverage data found in the input files.");
            return Ok(());
        }

        let gaps: usize = rows.iter().map(|row| row.gaps).sum();

        match self.output {
            OutputFormat::Json => Self::output_json(&rows, gaps, coverage.unmapped.len())?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&rows, gaps, coverage.unmapped.len());
                } else {
                    Self::output_table(&rows, gaps, coverage.unmapped.len());
                }
            }
        }

        // Exit with a non-zero code when something is left uncovered.
        if gaps > 0 {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(rows: &[Row], gaps: usize, unmapped: usize) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "interfaces": rows,
            "gaps": gaps,
            "unmapped": unmapped,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(rows: &[Row], gaps: usize, unmapped: usize) {
        let zero = rows.iter().filter(|row| row.test_cases == 0).count();
        println!("interfaces={} zero={zero} gaps={gaps} unmapped={unmapped}", rows.len());
    }

    fn output_table(rows: &[Row], gaps: usize, unmapped: usize) {
        let narrow = is_narrow();

        println!("Test cases by interface");
        println!("{}", "───────────────────────".dim());

        if narrow {
            // Stacked output for narrow terminals
            for row in rows {
                let line = format!(
                    "[{}] {}: {} tests, {} gaps",
                    view_name(row.view),
                    row.label(),
                    row.test_cases,
                    row.gaps
                );
                if row.test_cases == 0 {
                    println!("{}", line.warning());
                } else {
                    println!("{line}");
                }
            }
        } else {
            let width = rows
                .iter()
                .map(|row| row.label().chars().count())
                .max()
                .unwrap_or_default()
                .max("Interface".len());
            println!("{:<9} {:<width$} {:<6} Gaps", "View", "Interface", "Tests");
            for row in rows {
                let tests = format!("{:<6}", row.test_cases);
                let tests = if row.test_cases == 0 {
                    tests.warning()
                } else {
                    tests
                };
                let row_gaps = if row.gaps == 0 {
                    row.gaps.dim()
                } else {
                    row.gaps.warning()
                };
                println!(
                    "{:<9} {:<width$} {tests} {row_gaps}",
                    view_name(row.view),
                    row.label()
                );
            }
        }

        println!();

        if gaps == 0 {
            println!("Uncovered: {} ✅", "0".success());
        } else {
            println!("Uncovered: {} ⚠️", gaps.warning());
            println!("{}", "Run 'reqcov gaps' to list them.".dim());
        }

        if unmapped > 0 {
            println!();
            println!("Unmapped: {} ⚠️", unmapped.warning());
            println!("{}", "Run 'reqcov unmapped' to list them.".dim());
        }
    }
}
