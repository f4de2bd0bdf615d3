//! Hierarchical requirement and test-coverage aggregation.
//!
//! Flat, denormalized requirement/test-case records are filtered
//! ([`classify`]), folded into a deduplicated hierarchy ([`aggregate`]) and
//! rendered as deterministic markdown ([`render`]).

pub mod domain;
pub use domain::{Config, CoverageRoot, Key, Merge, Requirement, Status, TestCase, Upsert};

pub mod record;
pub use record::{DataFormatError, Inputs};

pub mod classify;

pub mod aggregate;
pub use aggregate::{Aggregator, Coverage, UnmappedRequirement};

pub mod render;
pub use render::{Outline, View};
