use tracing::instrument;

use super::{Aggregator, BuildStats};
use crate::{
    classify::AsteriskIdps,
    domain::CoverageRoot,
    record::{IerRecord, ServiceLookup},
};

impl Aggregator<'_> {
    /// Builds the IER hierarchy: PI → IER → service → test case.
    ///
    /// The status/coverage filter runs first, and the asterisk-IDP set is
    /// computed from the records that survive it. Records failing the
    /// asterisk rule are then skipped before grouping. Services are resolved
    /// from each record's TIN title, falling back to an empty name.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build_ier(&self, records: &[IerRecord], services: &ServiceLookup) -> CoverageRoot {
        let mut root = CoverageRoot::new();
        let mut stats = BuildStats {
            records: records.len(),
            ..BuildStats::default()
        };

        let eligible = self.eligible_ier_records(records);
        stats.filtered = records.len() - eligible.len();

        let asterisks = AsteriskIdps::from_records(eligible.iter().map(|&(_, record)| record));

        for (index, record) in eligible {
            if !asterisks.includes(record) {
                tracing::debug!(
                    index,
                    "record superseded by an asterisked entry: {}",
                    record.idp_tin_name.as_deref().unwrap_or_default()
                );
                stats.filtered += 1;
                continue;
            }

            let (Some(pi_number), Some(ier_number)) = (&record.pi_number, &record.ier_number)
            else {
                tracing::debug!(index, "record dropped from IER view: missing key field");
                stats.missing_key += 1;
                continue;
            };

            let service = root
                .upsert_programmatic_interface(
                    pi_number.clone(),
                    record.pi_name.clone().unwrap_or_default(),
                )
                .upsert_exchange_requirement(
                    ier_number.clone(),
                    record.ier_name.clone().unwrap_or_default(),
                )
                .upsert_service(services.resolve(record.tin_name.as_deref()));

            if let Some(key) = &record.test_case_key {
                let test_case = service.upsert_test_case(
                    key.clone(),
                    record.test_case_name.clone().unwrap_or_default(),
                );
                test_case.set_attribute("state", record.test_case_state.clone());
            }
            stats.kept += 1;
        }

        stats.report("ier");
        root
    }

    /// Records passing the status/coverage filter, paired with their position
    /// in the input.
    fn eligible_ier_records<'r>(&self, records: &'r [IerRecord]) -> Vec<(usize, &'r IerRecord)> {
        records
            .iter()
            .enumerate()
            .filter(|&(index, record)| {
                let included = self.filter.includes(record);
                if !included {
                    tracing::debug!(index, "record excluded by status/coverage filter");
                }
                included
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::Config,
        record::{ServiceRow, parse_records},
    };

    fn records(value: serde_json::Value) -> Vec<IerRecord> {
        parse_records("ier", value).unwrap()
    }

    fn services() -> ServiceLookup {
        let rows: Vec<ServiceRow> = parse_records(
            "services",
            json!([{"TIN": "SVC-RADAR", "Title": "Radar Feed"}]),
        )
        .unwrap();
        ServiceLookup::from_rows(&rows)
    }

    #[test]
    fn groups_by_resolved_service() {
        let config = Config::default();
        let input = records(json!([
            {"piNumber": "PI1", "piName": "Bus", "ierNumber": "IER1", "ierName": "Track",
             "tinName": "Radar Feed", "testCaseKey": "TC1", "testCaseName": "One",
             "testCaseState": "Passed"},
            {"piNumber": "PI1", "ierNumber": "IER1", "tinName": "Unknown Title",
             "testCaseKey": "TC2"}
        ]));

        let root = Aggregator::new(&config).build_ier(&input, &services());

        let pi = &root.programmatic_interfaces["PI1"];
        assert_eq!(pi.name, "Bus");
        let ier = &pi.exchange_requirements["IER1"];
        assert_eq!(ier.name, "Track");
        assert_eq!(
            ier.services.keys().map(String::as_str).collect::<Vec<_>>(),
            ["", "SVC-RADAR"]
        );
        let test_case = &ier.services["SVC-RADAR"].test_cases["TC1"];
        assert_eq!(test_case.attributes.get("state").map(String::as_str), Some("Passed"));
        assert_eq!(pi.test_case_count(), 2);
    }

    #[test]
    fn asterisk_rule_drops_superseded_entries() {
        let config = Config::default();
        let input = records(json!([
            {"piNumber": "PI1", "ierNumber": "IER1", "idpTinName": "IDP-9 -> A *",
             "testCaseKey": "TC1"},
            {"piNumber": "PI1", "ierNumber": "IER2", "idpTinName": "IDP-9 -> B",
             "testCaseKey": "TC2"}
        ]));

        let root = Aggregator::new(&config).build_ier(&input, &ServiceLookup::default());

        let iers: Vec<&str> = root.programmatic_interfaces["PI1"]
            .exchange_requirements
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(iers, ["IER1"]);
    }

    #[test]
    fn deprecated_asterisk_entry_does_not_suppress_others() {
        let config = Config::default();
        let input = records(json!([
            {"piNumber": "PI1", "ierNumber": "IER1", "idpTinName": "IDP-9 -> A *",
             "status": "Deprecated", "testCaseKey": "TC1"},
            {"piNumber": "PI1", "ierNumber": "IER2", "idpTinName": "IDP-9 -> B",
             "testCaseKey": "TC2"}
        ]));

        let root = Aggregator::new(&config).build_ier(&input, &ServiceLookup::default());

        let iers: Vec<&str> = root.programmatic_interfaces["PI1"]
            .exchange_requirements
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(iers, ["IER2"]);
    }

    #[test]
    fn eligible_records_keep_their_input_position() {
        let config = Config::default();
        let input = records(json!([
            {"piNumber": "PI1", "ierNumber": "IER1", "status": "Draft"},
            {"piNumber": "PI1", "ierNumber": "IER2", "coverageType": "tdp"},
            {"piNumber": "PI1", "ierNumber": "IER3"}
        ]));

        let eligible = Aggregator::new(&config).eligible_ier_records(&input);

        let positions: Vec<(usize, &str)> = eligible
            .iter()
            .map(|(index, record)| (*index, record.ier_number.as_deref().unwrap_or_default()))
            .collect();
        assert_eq!(positions, [(2, "IER3")]);
    }

    #[test]
    fn records_without_keys_are_skipped() {
        let config = Config::default();
        let input = records(json!([
            {"ierNumber": "IER1", "testCaseKey": "TC1"},
            {"piNumber": "PI1", "testCaseKey": "TC2"}
        ]));

        let root = Aggregator::new(&config).build_ier(&input, &ServiceLookup::default());
        assert!(root.is_empty());
    }
}
