//! End-to-end behaviour of aggregation and rendering, starting from JSON
//! datasets.

use reqcov::{Config, Coverage, View, aggregate::aggregate_json, render};
use serde_json::{Value, json};
use test_case::test_case;

fn aggregate(sreq: Value, ier: Value, mapping: Option<Value>) -> Coverage {
    aggregate_json(&Config::default(), sreq, ier, mapping, None).unwrap()
}

fn example_record() -> Value {
    json!({
        "siNumber": "SI1", "siName": "Alpha", "tinNumber": "T1", "epName": "E1",
        "sreqNumber": "R1", "sreqName": "Req One", "testCaseKey": "TC1",
        "testCaseName": "Case One", "actor": "UserA", "status": "Active"
    })
}

fn mixed_records() -> Vec<Value> {
    vec![
        example_record(),
        json!({"siNumber": "SI1", "tinNumber": "T1", "epName": "E1", "sreqNumber": "R1",
               "testCaseKey": "TC2", "actor": "UserB"}),
        json!({"siNumber": "SI2", "siName": "Beta", "tinNumber": "T9", "epNumber": "EP3",
               "epName": "Gateway", "sreqNumber": "R7", "sreqName": "Other"}),
        json!({"siNumber": "SI1", "tinNumber": "T2", "epName": "E4", "sreqNumber": "R3",
               "testCaseKey": "TC1", "actor": "UserC"}),
    ]
}

#[test]
fn example_record_builds_expected_tree() {
    let coverage = aggregate(json!([example_record()]), json!([]), None);

    let si = &coverage.root.system_interfaces["SI1"];
    assert_eq!(si.name, "Alpha");
    let requirement = &si.technical_interfaces["T1"].exchange_points["E1"].requirements["R1"];
    assert_eq!(requirement.name, "Req One");
    let test_case = &requirement.test_cases["TC1"];
    assert_eq!(test_case.name, "Case One");
    assert_eq!(
        test_case.actors.iter().map(String::as_str).collect::<Vec<_>>(),
        ["UserA"]
    );

    let report = render::render_coverage(&coverage.root, View::Tin);
    assert!(report.contains("#### R1 Req One (1)\n- TC1 -> Case One\n"));
}

#[test]
fn aggregation_is_idempotent() {
    let records = Value::Array(mixed_records());

    let first = aggregate(records.clone(), json!([]), None);
    let second = aggregate(records, json!([]), None);

    assert_eq!(first, second);
}

#[test]
fn duplicate_records_do_not_duplicate_actors() {
    let once = aggregate(json!([example_record()]), json!([]), None);
    let twice = aggregate(json!([example_record(), example_record()]), json!([]), None);

    assert_eq!(once, twice);
    let actors = &twice.root.system_interfaces["SI1"].technical_interfaces["T1"].exchange_points
        ["E1"]
        .requirements["R1"]
        .test_cases["TC1"]
        .actors;
    assert_eq!(actors.len(), 1);
}

#[test]
fn asterisk_entry_supersedes_its_idp_siblings() {
    let coverage = aggregate(
        json!([]),
        json!([
            {"piNumber": "PI1", "ierNumber": "IER-A", "idpTinName": "IDP-9 -> A *"},
            {"piNumber": "PI1", "ierNumber": "IER-B", "idpTinName": "IDP-9 -> B"},
            {"piNumber": "PI1", "ierNumber": "IER-C", "idpTinName": "IDP-4 -> C"},
            {"piNumber": "PI1", "ierNumber": "IER-D"}
        ]),
        None,
    );

    let iers: Vec<&str> = coverage.root.programmatic_interfaces["PI1"]
        .exchange_requirements
        .keys()
        .map(|key| key.as_str())
        .collect();
    assert_eq!(iers, ["IER-A", "IER-C", "IER-D"]);
}

#[test_case(true; "key present in IER input")]
#[test_case(false; "key absent from IER input")]
fn cross_dataset_exclusion(in_ier: bool) {
    let sreq = json!([{"siNumber": "SI1", "tinNumber": "T1", "epName": "E1",
                       "sreqNumber": "R1", "testCaseKey": "TC-1"}]);
    let ier = if in_ier {
        json!([{"piNumber": "PI1", "ierNumber": "IER1", "testCaseKey": "TC-1"}])
    } else {
        json!([{"piNumber": "PI1", "ierNumber": "IER1", "testCaseKey": "TC-2"}])
    };

    let coverage = aggregate(sreq, ier, None);

    let requirement = &coverage.root.system_interfaces["SI1"].technical_interfaces["T1"]
        .exchange_points["E1"]
        .requirements["R1"];
    assert_eq!(requirement.test_cases.contains_key("TC-1"), !in_ier);
}

#[test_case(json!({"status": "Draft"}); "draft")]
#[test_case(json!({"status": "Deprecated"}); "deprecated")]
#[test_case(json!({"coverageType": "tdp"}); "transitive coverage")]
fn filtered_records_never_appear(overrides: Value) {
    let mut excluded = json!({
        "siNumber": "SI9", "tinNumber": "T9", "epName": "E9", "sreqNumber": "R9",
        "testCaseKey": "TC9", "piNumber": "PI9", "ierNumber": "IER9"
    });
    for (field, value) in overrides.as_object().unwrap() {
        excluded[field] = value.clone();
    }

    let coverage = aggregate(
        json!([example_record(), excluded.clone()]),
        json!([excluded]),
        Some(json!([{"sreqNumber": "R9", "funName": "Hidden"}])),
    );

    assert!(!coverage.root.system_interfaces.contains_key("SI9"));
    assert!(!coverage.root.programmatic_interfaces.contains_key("PI9"));
    for view in [View::Tin, View::Function, View::Ier] {
        let report = render::render_coverage(&coverage.root, view);
        assert!(!report.contains("R9"), "{report}");
        assert!(!report.contains("TC9"), "{report}");
    }
}

#[test]
fn rendering_is_independent_of_record_order() {
    let records = mixed_records();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = aggregate(Value::Array(records), json!([]), None);
    let backward = aggregate(Value::Array(reversed), json!([]), None);

    for view in [View::Tin, View::Function, View::Ier] {
        let rendered = render::render_coverage(&forward.root, view);
        assert_eq!(rendered, render::render_coverage(&forward.root, view));
        assert_eq!(rendered, render::render_coverage(&backward.root, view));
    }
    assert_eq!(
        render::render_gaps(&forward.root, View::Tin, 20),
        render::render_gaps(&backward.root, View::Tin, 20)
    );
}

#[test]
fn unmapped_requirements_are_reported_not_grouped() {
    let coverage = aggregate(
        Value::Array(mixed_records()),
        json!([]),
        Some(json!([
            {"sreqNumber": "R1", "funName": "Navigate"},
            {"sreqNumber": "R3", "funName": "Navigate"}
        ])),
    );

    let unmapped: Vec<(&str, &str, &str)> = coverage
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
    assert_eq!(unmapped, [("R7", "SI2", "Beta")]);

    let si2 = &coverage.root.system_interfaces["SI2"];
    assert!(si2.functions.is_empty());
    assert!(
        si2.technical_interfaces["T9"].exchange_points["EP3"]
            .requirements
            .contains_key("R7")
    );

    let table = render::render_unmapped(&coverage.unmapped);
    assert!(table.contains("| R7 | Other | SI2 | Beta |"));
}

#[test]
fn malformed_dataset_fails_the_whole_run() {
    let result = aggregate_json(
        &Config::default(),
        json!({"siNumber": "SI1"}),
        json!([]),
        None,
        None,
    );
    assert!(result.is_err());
}
