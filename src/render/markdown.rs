use crate::{
    aggregate::UnmappedRequirement,
    render::{NodeKind, Outline, OutlineNode},
};

/// How requirement-level nodes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Full coverage report: requirement headings with counts, test case
    /// bullets.
    Coverage,
    /// Gap report: one bullet per uncovered requirement or IER, with its
    /// name truncated to `width` characters.
    Gaps {
        /// Maximum name width in characters.
        width: usize,
    },
}

/// Writes an outline as markdown.
///
/// Output is a pure function of the outline, so equal outlines render to
/// byte-identical text.
#[must_use]
pub fn write(outline: &Outline, style: Style) -> String {
    let mut writer = Writer {
        style,
        lines: Vec::new(),
    };
    for node in &outline.nodes {
        writer.node(node);
    }
    writer.finish()
}

struct Writer {
    style: Style,
    lines: Vec<String>,
}

impl Writer {
    fn node(&mut self, node: &OutlineNode) {
        match node.kind {
            NodeKind::SystemInterface | NodeKind::ProgrammaticInterface => {
                self.lines.push(format!("## {}", node.label()));
                self.children(node);
            }
            NodeKind::TechnicalInterface => {
                if node.children.is_empty() {
                    self.lines.push(format!("### {}", node.label()));
                }
                // TIN and EP share a heading so requirements stay at level 4.
                for ep in &node.children {
                    self.lines
                        .push(format!("### {} / {}", node.label(), ep.label()));
                    self.children(ep);
                }
            }
            NodeKind::ExchangePoint | NodeKind::Function => {
                self.lines.push(format!("### {}", node.label()));
                self.children(node);
            }
            NodeKind::Requirement => match self.style {
                Style::Coverage => {
                    self.lines
                        .push(format!("#### {} ({})", node.label(), node.count));
                    self.children(node);
                }
                Style::Gaps { width } => self.gap(node, width),
            },
            NodeKind::ExchangeRequirement => match self.style {
                Style::Coverage => {
                    self.lines.push(format!("### {}", node.label()));
                    self.children(node);
                }
                Style::Gaps { width } => self.gap(node, width),
            },
            NodeKind::Service => {
                self.lines
                    .push(format!("- TIN: {}", node.key).trim_end().to_string());
                for test_case in &node.children {
                    self.lines.push(format!("  {}", test_case_line(test_case)));
                }
            }
            NodeKind::TestCase => self.lines.push(test_case_line(node)),
        }
    }

    fn children(&mut self, node: &OutlineNode) {
        for child in &node.children {
            self.node(child);
        }
    }

    fn gap(&mut self, node: &OutlineNode, width: usize) {
        let line = if node.name.is_empty() {
            format!("- {}", node.key)
        } else {
            format!("- {} {}", node.key, truncate(&node.name, width))
        };
        self.lines.push(line);
    }

    fn finish(self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn test_case_line(node: &OutlineNode) -> String {
    format!("- {} -> {}", node.key, node.name).trim_end().to_string()
}

/// Shortens `text` to at most `width` characters, marking the cut with
/// `...`.
///
/// Widths too narrow for the marker cut the text without it.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    const ELLIPSIS: &str = "...";

    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let kept: String = text
        .chars()
        .take(width.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}

/// Writes the unmapped-requirements diagnostic as a markdown table.
#[must_use]
pub fn unmapped_table(unmapped: &[UnmappedRequirement]) -> String {
    let mut lines = vec![
        "| Requirement | Name | SI | SI Name |".to_string(),
        "| --- | --- | --- | --- |".to_string(),
    ];
    lines.extend(unmapped.iter().map(|entry| {
        format!(
            "| {} | {} | {} | {} |",
            cell(&entry.number),
            cell(&entry.name),
            cell(&entry.si_number),
            cell(&entry.si_name)
        )
    }));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}
