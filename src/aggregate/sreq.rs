use std::collections::BTreeMap;

use tracing::instrument;

use super::{Aggregator, BuildStats, FunctionView, UnmappedRequirement};
use crate::{
    classify::IerTestCaseIndex,
    domain::{CoverageRoot, Key, Requirement, Status, Upsert},
    record::{FunctionalMapping, SreqRecord},
};

impl Aggregator<'_> {
    /// Builds the TIN view: SI → TIN → EP → requirement → test case.
    ///
    /// Records excluded by the status/coverage filter, or lacking an SI, TIN,
    /// EP or requirement key, are skipped. Test cases already reported under
    /// IER coverage are not attached.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build_by_tin(
        &self,
        records: &[SreqRecord],
        ier_index: &IerTestCaseIndex,
    ) -> CoverageRoot {
        let mut root = CoverageRoot::new();
        let mut stats = BuildStats {
            records: records.len(),
            ..BuildStats::default()
        };

        for (index, record) in records.iter().enumerate() {
            if !self.filter.includes(record) {
                tracing::debug!(index, "record excluded by status/coverage filter");
                stats.filtered += 1;
                continue;
            }

            let (Some(si_number), Some(tin_number), Some(ep_key), Some(sreq_number)) = (
                &record.si_number,
                &record.tin_number,
                record.exchange_point_key(),
                &record.sreq_number,
            ) else {
                tracing::debug!(index, "record dropped from TIN view: missing key field");
                stats.missing_key += 1;
                continue;
            };

            let exchange_point = root
                .upsert_system_interface(si_number.clone(), text(record.si_name.as_deref()))
                .upsert_technical_interface(tin_number.clone(), text(record.tin_name.as_deref()))
                .upsert_exchange_point(ep_key, record.exchange_point_name().to_string());

            let requirement =
                self.upsert_requirement(&mut exchange_point.requirements, sreq_number, record);
            self.attach_test_case(requirement, record, ier_index);
            stats.kept += 1;
        }

        stats.report("tin");
        root
    }

    /// Builds the function view: SI → function → requirement → test case.
    ///
    /// Requirements missing from the functional mapping are left out of the
    /// tree and reported in [`FunctionView::unmapped`] instead, once per
    /// requirement and SI.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build_by_function(
        &self,
        records: &[SreqRecord],
        mapping: &FunctionalMapping,
        ier_index: &IerTestCaseIndex,
    ) -> FunctionView {
        let mut root = CoverageRoot::new();
        let mut unmapped: BTreeMap<(Key, Key), UnmappedRequirement> = BTreeMap::new();
        let mut stats = BuildStats {
            records: records.len(),
            ..BuildStats::default()
        };

        for (index, record) in records.iter().enumerate() {
            if !self.filter.includes(record) {
                tracing::debug!(index, "record excluded by status/coverage filter");
                stats.filtered += 1;
                continue;
            }

            let (Some(si_number), Some(sreq_number)) = (&record.si_number, &record.sreq_number)
            else {
                tracing::debug!(index, "record dropped from function view: missing key field");
                stats.missing_key += 1;
                continue;
            };

            let Some(target) = mapping.get(sreq_number) else {
                tracing::debug!(index, "requirement {sreq_number} has no functional mapping");
                let entry = unmapped
                    .entry((sreq_number.clone(), si_number.clone()))
                    .or_insert_with(|| UnmappedRequirement {
                        number: sreq_number.clone(),
                        name: String::new(),
                        si_number: si_number.clone(),
                        si_name: String::new(),
                    });
                update_unmapped(entry, record);
                continue;
            };

            let si_name = record
                .si_name
                .clone()
                .or_else(|| target.si_name.clone())
                .unwrap_or_default();
            let function = root
                .upsert_system_interface(si_number.clone(), si_name)
                .upsert_function(target.function.clone());

            let requirement =
                self.upsert_requirement(&mut function.requirements, sreq_number, record);
            self.attach_test_case(requirement, record, ier_index);
            stats.kept += 1;
        }

        stats.report("function");
        if !unmapped.is_empty() {
            tracing::warn!("{} requirements have no functional mapping", unmapped.len());
        }

        FunctionView {
            root,
            unmapped: unmapped.into_values().collect(),
        }
    }

    /// Upserts the record's requirement and echoes its scalar fields into it.
    fn upsert_requirement<'r>(
        &self,
        requirements: &'r mut BTreeMap<Key, Requirement>,
        number: &Key,
        record: &SreqRecord,
    ) -> &'r mut Requirement {
        let requirement = requirements.upsert(number.clone(), || {
            Requirement::new(number.clone(), String::new(), Status::Active)
        });
        let actor = record
            .actor
            .as_deref()
            .map(|actor| self.actor_name(Some(actor)));
        requirement.update(
            text(record.sreq_name.as_deref()),
            Status::from_field(record.status.as_deref()),
            actor,
        );
        requirement
    }

    /// Attaches the record's test case to a requirement.
    ///
    /// Returns `false` when the record has no test case, or when the test case
    /// is already covered by an IER.
    fn attach_test_case(
        &self,
        requirement: &mut Requirement,
        record: &SreqRecord,
        ier_index: &IerTestCaseIndex,
    ) -> bool {
        let Some(key) = &record.test_case_key else {
            return false;
        };
        if ier_index.contains(key) {
            tracing::debug!(
                "test case {key} of {} is reported under IER coverage",
                requirement.number
            );
            return false;
        }

        let test_case =
            requirement.upsert_test_case(key.clone(), text(record.test_case_name.as_deref()));
        test_case.add_actor(self.actor_name(record.actor.as_deref()));
        test_case.set_attribute("coverageType", record.coverage_type.clone());
        true
    }
}

/// Echo the latest non-empty names into an unmapped entry.
///
/// Entries are keyed by requirement and SI, so the SI name always belongs to
/// the entry's SI number.
fn update_unmapped(entry: &mut UnmappedRequirement, record: &SreqRecord) {
    if let Some(name) = &record.sreq_name {
        entry.name.clone_from(name);
    }
    if let Some(si_name) = &record.si_name {
        entry.si_name.clone_from(si_name);
    }
}

fn text(field: Option<&str>) -> String {
    field.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::{
        domain::Config,
        record::{IerRecord, MappingRecord, parse_records},
    };

    fn records(value: serde_json::Value) -> Vec<SreqRecord> {
        parse_records("sreq", value).unwrap()
    }

    fn example() -> Vec<SreqRecord> {
        records(json!([{
            "siNumber": "SI1", "siName": "Alpha", "tinNumber": "T1", "epName": "E1",
            "sreqNumber": "R1", "sreqName": "Req One", "testCaseKey": "TC1",
            "testCaseName": "Case One", "actor": "UserA", "status": "Active"
        }]))
    }

    #[test]
    fn builds_tin_view() {
        let config = Config::default();
        let root =
            Aggregator::new(&config).build_by_tin(&example(), &IerTestCaseIndex::default());

        let si = &root.system_interfaces["SI1"];
        assert_eq!(si.name, "Alpha");
        let requirement = &si.technical_interfaces["T1"].exchange_points["E1"].requirements["R1"];
        assert_eq!(requirement.name, "Req One");
        assert_eq!(requirement.test_case_count(), 1);

        let test_case = &requirement.test_cases["TC1"];
        assert_eq!(test_case.name, "Case One");
        assert_eq!(
            test_case.actors.iter().map(String::as_str).collect::<Vec<_>>(),
            ["UserA"]
        );
    }

    #[test]
    fn duplicate_records_do_not_duplicate_actors() {
        let config = Config::default();
        let aggregator = Aggregator::new(&config);
        let once = example();
        let twice: Vec<SreqRecord> = once.iter().chain(once.iter()).cloned().collect();

        let index = IerTestCaseIndex::default();
        assert_eq!(
            aggregator.build_by_tin(&once, &index),
            aggregator.build_by_tin(&twice, &index)
        );
    }

    #[test]
    fn actors_are_unioned_and_defaulted() {
        let config = Config::default();
        let input = records(json!([
            {"siNumber": "SI1", "tinNumber": "T1", "epNumber": "E1", "sreqNumber": "R1",
             "testCaseKey": "TC1", "actor": "UserA"},
            {"siNumber": "SI1", "tinNumber": "T1", "epNumber": "E1", "sreqNumber": "R1",
             "testCaseKey": "TC1"}
        ]));

        let root = Aggregator::new(&config).build_by_tin(&input, &IerTestCaseIndex::default());
        let test_case = &root.tin_requirements().next().unwrap().test_cases["TC1"];

        assert_eq!(
            test_case.actors.iter().map(String::as_str).collect::<Vec<_>>(),
            ["N/A", "UserA"]
        );
    }

    #[test]
    fn records_missing_keys_are_skipped() {
        let config = Config::default();
        let input = records(json!([
            {"tinNumber": "T1", "epName": "E1", "sreqNumber": "R1"},
            {"siNumber": "SI1", "epName": "E1", "sreqNumber": "R2"},
            {"siNumber": "SI1", "tinNumber": "T1", "sreqNumber": "R3"},
            {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1"},
            {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R5"}
        ]));

        let root = Aggregator::new(&config).build_by_tin(&input, &IerTestCaseIndex::default());
        let numbers: Vec<&str> = root.tin_requirements().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, ["R5"]);
    }

    #[test]
    fn excluded_records_never_appear() {
        let config = Config::default();
        let input = records(json!([
            {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R1",
             "status": "Draft", "testCaseKey": "TC1"},
            {"siNumber": "SI2", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R2",
             "coverageType": "tdp", "testCaseKey": "TC2"}
        ]));

        let root = Aggregator::new(&config).build_by_tin(&input, &IerTestCaseIndex::default());
        assert!(root.is_empty());
    }

    #[test]
    fn ier_covered_test_cases_are_not_attached() {
        let config = Config::default();
        let ier: Vec<IerRecord> = parse_records(
            "ier",
            json!([{"piNumber": "PI1", "ierNumber": "I1", "testCaseKey": "TC1"}]),
        )
        .unwrap();
        let index = IerTestCaseIndex::from_records(&ier);

        let root = Aggregator::new(&config).build_by_tin(&example(), &index);
        let requirement = root.tin_requirements().next().unwrap();

        assert_eq!(requirement.number.as_str(), "R1");
        assert_eq!(requirement.test_case_count(), 0);
    }

    #[test]
    fn unmapped_requirements_are_reported() {
        let config = Config::default();
        let input = records(json!([
            {"siNumber": "SI1", "siName": "Alpha", "tinNumber": "T1", "epName": "E1",
             "sreqNumber": "R1", "testCaseKey": "TC1"},
            {"siNumber": "SI1", "siName": "Alpha", "tinNumber": "T1", "epName": "E1",
             "sreqNumber": "R2", "sreqName": "Req Two", "testCaseKey": "TC2"},
            {"siNumber": "SI1", "tinNumber": "T1", "epName": "E1",
             "sreqNumber": "R2", "testCaseKey": "TC3"}
        ]));
        let mapping = FunctionalMapping::from_records(&[MappingRecord {
            sreq_number: Key::new("R1").ok(),
            fun_name: Key::new("Navigate").ok(),
            si_name: Some("Alpha (mapped)".to_string()),
        }]);
        let aggregator = Aggregator::new(&config);
        let index = IerTestCaseIndex::default();

        let view = aggregator.build_by_function(&input, &mapping, &index);

        let numbers: Vec<&str> = view
            .root
            .function_requirements()
            .map(|r| r.number.as_str())
            .collect();
        assert_eq!(numbers, ["R1"]);
        assert_eq!(
            view.unmapped,
            [UnmappedRequirement {
                number: Key::new("R2").unwrap(),
                name: "Req Two".to_string(),
                si_number: Key::new("SI1").unwrap(),
                si_name: "Alpha".to_string(),
            }]
        );
        assert_eq!(view.root.system_interfaces["SI1"].name, "Alpha");

        let tin_view = aggregator.build_by_tin(&input, &index);
        assert_eq!(tin_view.tin_requirements().count(), 2);
    }

    #[test_case(false; "in input order")]
    #[test_case(true; "in reverse order")]
    fn unmapped_entries_keep_their_own_si_context(reversed: bool) {
        let config = Config::default();
        let mut input = records(json!([
            {"siNumber": "SI1", "siName": "Alpha", "sreqNumber": "R1"},
            {"siNumber": "SI2", "siName": "Beta", "sreqNumber": "R1"}
        ]));
        if reversed {
            input.reverse();
        }

        let view = Aggregator::new(&config).build_by_function(
            &input,
            &FunctionalMapping::default(),
            &IerTestCaseIndex::default(),
        );

        let contexts: Vec<(&str, &str, &str)> = view
            .unmapped
            .iter()
            .map(|entry| {
                (
                    entry.number.as_str(),
                    entry.si_number.as_str(),
                    entry.si_name.as_str(),
                )
            })
            .collect();
        assert_eq!(contexts, [("R1", "SI1", "Alpha"), ("R1", "SI2", "Beta")]);
    }

    #[test]
    fn function_view_takes_si_name_from_mapping_when_absent() {
        let config = Config::default();
        let input = records(json!([{"siNumber": "SI1", "sreqNumber": "R1"}]));
        let mapping = FunctionalMapping::from_records(&[MappingRecord {
            sreq_number: Key::new("R1").ok(),
            fun_name: Key::new("Navigate").ok(),
            si_name: Some("Alpha".to_string()),
        }]);

        let view = Aggregator::new(&config).build_by_function(
            &input,
            &mapping,
            &IerTestCaseIndex::default(),
        );

        let si = &view.root.system_interfaces["SI1"];
        assert_eq!(si.name, "Alpha");
        assert!(si.functions["Navigate"].requirements.contains_key("R1"));
    }
}
