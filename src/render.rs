//! Deterministic markdown reports over a [`CoverageRoot`].
//!
//! Rendering goes through an [`Outline`], an ordered tree carrying per-node
//! test case counts and zero-count flags. Traversal is in ascending key order
//! at every level, so identical roots always produce identical text.
//!
//! ```text
//! ## SI1 Alpha
//! ### T1 / E1
//! #### R1 Req One (1)
//! - TC1 -> Case One
//! ```

mod markdown;
mod outline;

pub use markdown::{Style, truncate};
pub use outline::{NodeKind, Outline, OutlineNode, View};

use crate::{aggregate::UnmappedRequirement, domain::CoverageRoot};

/// Renders the full coverage report for the TIN or function view.
///
/// Passing [`View::Ier`] renders the IER report, as [`render_ier`] does.
#[must_use]
pub fn render_coverage(root: &CoverageRoot, view: View) -> String {
    markdown::write(&Outline::build(root, view), Style::Coverage)
}

/// Renders the IER report: PI → IER → service → test case.
#[must_use]
pub fn render_ier(root: &CoverageRoot) -> String {
    render_coverage(root, View::Ier)
}

/// Renders the coverage gaps of one view.
///
/// Only requirements (or IERs) without any test case are listed, with names
/// truncated to `width` characters.
#[must_use]
pub fn render_gaps(root: &CoverageRoot, view: View, width: usize) -> String {
    markdown::write(
        &Outline::build(&root.uncovered(), view),
        Style::Gaps { width },
    )
}

/// Renders the requirements missing from the functional mapping as a table.
#[must_use]
pub fn render_unmapped(unmapped: &[UnmappedRequirement]) -> String {
    markdown::unmapped_table(unmapped)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{aggregate::aggregate_json, domain::Config};

    fn coverage() -> crate::aggregate::Coverage {
        aggregate_json(
            &Config::default(),
            json!([
                {"siNumber": "SI1", "siName": "Alpha", "tinNumber": "T1", "tinName": "Link",
                 "epName": "E1", "sreqNumber": "R1", "sreqName": "Req One",
                 "testCaseKey": "TC1", "testCaseName": "Case One", "actor": "UserA"},
                {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R2",
                 "sreqName": "A requirement whose name is far too long for the gap report"},
                {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R3",
                 "testCaseKey": "TC7", "testCaseName": "Shared"}
            ]),
            json!([
                {"piNumber": "PI1", "piName": "Bus", "ierNumber": "IER1", "ierName": "Track",
                 "tinName": "Radar Feed", "testCaseKey": "TC7", "testCaseName": "Shared"},
                {"piNumber": "PI1", "ierNumber": "IER2", "ierName": "Idle"}
            ]),
            Some(json!([{"sreqNumber": "R1", "funName": "Navigate"}])),
            Some(json!([{"TIN": "SVC-RADAR", "Title": "Radar Feed"}])),
        )
        .unwrap()
    }

    #[test]
    fn tin_report() {
        let expected = "\
## SI1 Alpha
### T1 Link / E1
#### R1 Req One (1)
- TC1 -> Case One
#### R2 A requirement whose name is far too long for the gap report (0)
#### R3 (0)
";
        assert_eq!(render_coverage(&coverage().root, View::Tin), expected);
    }

    #[test]
    fn function_report() {
        let expected = "\
## SI1 Alpha
### Navigate
#### R1 Req One (1)
- TC1 -> Case One
";
        assert_eq!(render_coverage(&coverage().root, View::Function), expected);
    }

    #[test]
    fn ier_report() {
        let expected = "\
## PI1 Bus
### IER1 Track
- TIN: SVC-RADAR
  - TC7 -> Shared
### IER2 Idle
- TIN:
";
        assert_eq!(render_ier(&coverage().root), expected);
    }

    #[test]
    fn gap_report_truncates_names() {
        let expected = "\
## SI1 Alpha
### T1 Link / E1
- R2 A requirement whose name is...
- R3
";
        assert_eq!(render_gaps(&coverage().root, View::Tin, 30), expected);
        assert_eq!(
            render_gaps(&coverage().root, View::Ier, 30),
            "## PI1 Bus\n- IER2 Idle\n"
        );
    }

    #[test]
    fn rendering_is_repeatable() {
        let root = coverage().root;
        assert_eq!(
            render_coverage(&root, View::Tin),
            render_coverage(&root, View::Tin)
        );
    }
}
