use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    ExchangePoint, Function, Key, ProgrammaticInterface, Requirement, SystemInterface,
    TechnicalInterface,
    merge::{Merge, Upsert, merge_scalar},
};

/// The result of one aggregation run.
///
/// Holds the requirement hierarchy (by SI) and the IER hierarchy (by PI). A
/// fresh root is built on every run; two roots built from the same records
/// compare equal regardless of record order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageRoot {
    /// System interfaces keyed by SI number.
    pub system_interfaces: BTreeMap<Key, SystemInterface>,
    /// Programmatic interfaces keyed by PI number.
    pub programmatic_interfaces: BTreeMap<Key, ProgrammaticInterface>,
}

impl CoverageRoot {
    /// Creates an empty root.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            system_interfaces: BTreeMap::new(),
            programmatic_interfaces: BTreeMap::new(),
        }
    }

    /// Returns `true` if the root holds no SI and no PI.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.system_interfaces.is_empty() && self.programmatic_interfaces.is_empty()
    }

    /// Returns the system interface with the given number, creating it if
    /// needed.
    pub fn upsert_system_interface(&mut self, number: Key, name: String) -> &mut SystemInterface {
        let si = self
            .system_interfaces
            .upsert(number.clone(), || SystemInterface::new(number, String::new()));
        merge_scalar(&mut si.name, name);
        si
    }

    /// Returns the programmatic interface with the given number, creating it
    /// if needed.
    pub fn upsert_programmatic_interface(
        &mut self,
        number: Key,
        name: String,
    ) -> &mut ProgrammaticInterface {
        let pi = self
            .programmatic_interfaces
            .upsert(number.clone(), || ProgrammaticInterface::new(number, String::new()));
        merge_scalar(&mut pi.name, name);
        pi
    }

    /// Iterate over every requirement of the TIN view.
    pub fn tin_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.system_interfaces
            .values()
            .flat_map(|si| si.technical_interfaces.values())
            .flat_map(|tin| tin.exchange_points.values())
            .flat_map(|ep| ep.requirements.values())
    }

    /// Iterate over every requirement of the function view.
    pub fn function_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.system_interfaces
            .values()
            .flat_map(|si| si.functions.values())
            .flat_map(|function| function.requirements.values())
    }

    /// A pruned copy holding only the coverage gaps.
    ///
    /// Keeps requirements and IERs without a single test case, together with
    /// the grouping nodes above them. Grouping nodes left without any gap are
    /// dropped.
    #[must_use]
    pub fn uncovered(&self) -> Self {
        let system_interfaces = self
            .system_interfaces
            .iter()
            .filter_map(|(key, si)| {
                let pruned = SystemInterface {
                    number: si.number.clone(),
                    name: si.name.clone(),
                    technical_interfaces: prune(&si.technical_interfaces, uncovered_tin),
                    functions: prune(&si.functions, uncovered_function),
                };
                let keep = !pruned.technical_interfaces.is_empty() || !pruned.functions.is_empty();
                keep.then(|| (key.clone(), pruned))
            })
            .collect();

        let programmatic_interfaces = self
            .programmatic_interfaces
            .iter()
            .filter_map(|(key, pi)| {
                let exchange_requirements: BTreeMap<_, _> = pi
                    .exchange_requirements
                    .iter()
                    .filter(|(_, ier)| ier.is_uncovered())
                    .map(|(key, ier)| (key.clone(), ier.clone()))
                    .collect();
                (!exchange_requirements.is_empty()).then(|| {
                    (
                        key.clone(),
                        ProgrammaticInterface {
                            number: pi.number.clone(),
                            name: pi.name.clone(),
                            exchange_requirements,
                        },
                    )
                })
            })
            .collect();

        Self {
            system_interfaces,
            programmatic_interfaces,
        }
    }
}

impl Merge for CoverageRoot {
    fn merge(&mut self, other: Self) {
        self.system_interfaces.merge_all(other.system_interfaces);
        self.programmatic_interfaces
            .merge_all(other.programmatic_interfaces);
    }
}

fn prune<V>(
    children: &BTreeMap<Key, V>,
    keep: impl Fn(&V) -> Option<V>,
) -> BTreeMap<Key, V> {
    children
        .iter()
        .filter_map(|(key, child)| keep(child).map(|pruned| (key.clone(), pruned)))
        .collect()
}

fn uncovered_requirements(
    requirements: &BTreeMap<Key, Requirement>,
) -> BTreeMap<Key, Requirement> {
    prune(requirements, |req| {
        (req.test_case_count() == 0).then(|| req.clone())
    })
}

fn uncovered_tin(tin: &TechnicalInterface) -> Option<TechnicalInterface> {
    let exchange_points = prune(&tin.exchange_points, |ep| {
        let requirements = uncovered_requirements(&ep.requirements);
        (!requirements.is_empty()).then(|| ExchangePoint {
            number: ep.number.clone(),
            name: ep.name.clone(),
            requirements,
        })
    });
    (!exchange_points.is_empty()).then(|| TechnicalInterface {
        number: tin.number.clone(),
        name: tin.name.clone(),
        exchange_points,
    })
}

fn uncovered_function(function: &Function) -> Option<Function> {
    let requirements = uncovered_requirements(&function.requirements);
    (!requirements.is_empty()).then(|| Function {
        name: function.name.clone(),
        requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    fn sample() -> CoverageRoot {
        let mut root = CoverageRoot::new();
        let si = root.upsert_system_interface(key("SI1"), "Alpha".to_string());
        let ep = si
            .upsert_technical_interface(key("T1"), String::new())
            .upsert_exchange_point(key("E1"), String::new());
        let covered = ep
            .requirements
            .upsert(key("R1"), || Requirement::new(key("R1"), String::new(), Status::Active));
        covered.upsert_test_case(key("TC1"), String::new());
        ep.requirements
            .upsert(key("R2"), || Requirement::new(key("R2"), String::new(), Status::Active));

        let other = root.upsert_system_interface(key("SI2"), String::new());
        let ep = other
            .upsert_technical_interface(key("T2"), String::new())
            .upsert_exchange_point(key("E2"), String::new());
        ep.requirements
            .upsert(key("R3"), || Requirement::new(key("R3"), String::new(), Status::Active))
            .upsert_test_case(key("TC3"), String::new());

        root.upsert_programmatic_interface(key("PI1"), String::new())
            .upsert_exchange_requirement(key("IER1"), String::new());
        root
    }

    #[test]
    fn uncovered_keeps_only_gaps() {
        let gaps = sample().uncovered();

        let numbers: Vec<&str> = gaps.tin_requirements().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, ["R2"]);
        assert!(!gaps.system_interfaces.contains_key("SI2"));
        assert!(
            gaps.programmatic_interfaces["PI1"].exchange_requirements["IER1"].is_uncovered()
        );
    }

    #[test]
    fn merge_with_self_is_identity() {
        let root = sample();
        let mut merged = root.clone();
        merged.merge(root.clone());
        assert_eq!(merged, root);
    }
}
