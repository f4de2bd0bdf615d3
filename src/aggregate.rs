//! The aggregation engine: folds flat records into a [`CoverageRoot`].
//!
//! Every build is a single pass of key-based upserts and merges, so the
//! resulting tree does not depend on record order. Records missing a key
//! field required by a view are skipped; nothing in here fails once the
//! input has been parsed.

mod ier;
mod sreq;

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    classify::{IerTestCaseIndex, RecordFilter},
    domain::{Config, CoverageRoot, Key, Merge},
    record::{ActorNames, DataFormatError, FunctionalMapping, Inputs, ServiceLookup},
};

/// A requirement that could not be placed in the function view because the
/// functional mapping has no entry for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedRequirement {
    /// Requirement number.
    pub number: Key,
    /// Requirement name.
    pub name: String,
    /// Number of the SI the requirement was found under.
    pub si_number: Key,
    /// Name of the SI the requirement was found under.
    pub si_name: String,
}

/// Result of the function-view build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionView {
    /// The function-rooted hierarchy.
    pub root: CoverageRoot,
    /// Requirements without a functional mapping, ordered by number then SI.
    pub unmapped: Vec<UnmappedRequirement>,
}

/// Result of a full aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// TIN view, function view and IER hierarchy, merged.
    pub root: CoverageRoot,
    /// Requirements without a functional mapping.
    pub unmapped: Vec<UnmappedRequirement>,
}

/// Builds coverage hierarchies from flat records.
///
/// Holds no state between runs; every build returns a fresh root.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    config: &'a Config,
    filter: RecordFilter,
    actors: Option<&'a ActorNames>,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator using the given configuration.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            filter: RecordFilter::new(config),
            actors: None,
        }
    }

    /// Resolve actor ids through a snapshot of the actor directory.
    #[must_use]
    pub fn with_actor_names(mut self, actors: &'a ActorNames) -> Self {
        self.actors = Some(actors);
        self
    }

    /// Runs every build over the given inputs and merges the results.
    ///
    /// The cross-dataset index is computed from the full IER input. The
    /// function view is only built when a functional mapping is present.
    #[must_use]
    #[instrument(level = "debug", skip_all)]
    pub fn build(&self, inputs: &Inputs) -> Coverage {
        let ier_index = IerTestCaseIndex::from_records(&inputs.ier);
        tracing::debug!("{} test cases already covered by IERs", ier_index.len());

        let mut root = self.build_by_tin(&inputs.sreq, &ier_index);

        let mut unmapped = Vec::new();
        if let Some(rows) = &inputs.mapping {
            let mapping = FunctionalMapping::from_records(rows);
            let view = self.build_by_function(&inputs.sreq, &mapping, &ier_index);
            root.merge(view.root);
            unmapped = view.unmapped;
        }

        let services = ServiceLookup::from_rows(&inputs.services);
        root.merge(self.build_ier(&inputs.ier, &services));

        Coverage { root, unmapped }
    }

    /// Display name of a record's actor, falling back to the configured
    /// default.
    fn actor_name(&self, actor: Option<&str>) -> String {
        match (actor, self.actors) {
            (Some(actor), Some(names)) => names.resolve(actor).to_string(),
            (Some(actor), None) => actor.to_string(),
            (None, _) => self.config.default_actor.clone(),
        }
    }
}

/// Parses the JSON datasets and aggregates them in one go.
///
/// # Errors
///
/// Returns a [`DataFormatError`] if any dataset is malformed. Nothing is
/// aggregated in that case.
pub fn aggregate_json(
    config: &Config,
    sreq: Value,
    ier: Value,
    mapping: Option<Value>,
    services: Option<Value>,
) -> Result<Coverage, DataFormatError> {
    let inputs = Inputs::from_json(sreq, ier, mapping, services)?;
    Ok(Aggregator::new(config).build(&inputs))
}

/// Per-build record accounting, reported once the build completes.
#[derive(Debug, Default)]
struct BuildStats {
    records: usize,
    kept: usize,
    filtered: usize,
    missing_key: usize,
}

impl BuildStats {
    fn report(&self, view: &str) {
        tracing::info!(
            view,
            records = self.records,
            kept = self.kept,
            filtered = self.filtered,
            missing_key = self.missing_key,
            "aggregated {view} view"
        );
    }
}
