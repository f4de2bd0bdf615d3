//! Levels of the interface exchange requirement (IER) hierarchy.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    Key, TestCase,
    merge::{Merge, Upsert, merge_scalar},
};

/// Test cases of an IER grouped by the service their TIN resolves to.
///
/// The service name is empty when the TIN title had no match in the service
/// lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Resolved service name.
    pub name: String,
    /// Test cases keyed by test case key.
    pub test_cases: BTreeMap<Key, TestCase>,
}

impl Service {
    /// Creates a service with no test cases.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            test_cases: BTreeMap::new(),
        }
    }

    /// Returns the test case with the given key, creating it if needed.
    pub fn upsert_test_case(&mut self, key: Key, name: String) -> &mut TestCase {
        let test_case = self
            .test_cases
            .upsert(key.clone(), || TestCase::new(key, String::new()));
        merge_scalar(&mut test_case.name, name);
        test_case
    }
}

impl Merge for Service {
    fn merge(&mut self, other: Self) {
        self.test_cases.merge_all(other.test_cases);
    }
}

/// An interface exchange requirement (IER).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceExchangeRequirement {
    /// IER number.
    pub number: Key,
    /// IER name.
    pub name: String,
    /// Services keyed by resolved service name.
    pub services: BTreeMap<String, Service>,
}

impl InterfaceExchangeRequirement {
    /// Creates an IER with no services.
    #[must_use]
    pub const fn new(number: Key, name: String) -> Self {
        Self {
            number,
            name,
            services: BTreeMap::new(),
        }
    }

    /// Returns the service with the given name, creating it if needed.
    pub fn upsert_service(&mut self, name: &str) -> &mut Service {
        self.services
            .entry(name.to_string())
            .or_insert_with(|| Service::new(name.to_string()))
    }

    /// Iterate over every test case of this IER, across all services.
    pub fn test_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.services
            .values()
            .flat_map(|service| service.test_cases.values())
    }

    /// Total number of test cases below this IER.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.services
            .values()
            .map(|service| service.test_cases.len())
            .sum()
    }

    /// Returns `true` if no test case is attached to this IER.
    #[must_use]
    pub fn is_uncovered(&self) -> bool {
        self.test_case_count() == 0
    }
}

impl Merge for InterfaceExchangeRequirement {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        for (name, service) in other.services {
            match self.services.get_mut(&name) {
                Some(existing) => existing.merge(service),
                None => {
                    self.services.insert(name, service);
                }
            }
        }
    }
}

/// A programmatic interface (PI), the top grouping of IER data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammaticInterface {
    /// PI number.
    pub number: Key,
    /// PI name.
    pub name: String,
    /// IERs keyed by IER number.
    pub exchange_requirements: BTreeMap<Key, InterfaceExchangeRequirement>,
}

impl ProgrammaticInterface {
    /// Creates a PI with no IERs.
    #[must_use]
    pub const fn new(number: Key, name: String) -> Self {
        Self {
            number,
            name,
            exchange_requirements: BTreeMap::new(),
        }
    }

    /// Returns the IER with the given number, creating it if needed.
    pub fn upsert_exchange_requirement(
        &mut self,
        number: Key,
        name: String,
    ) -> &mut InterfaceExchangeRequirement {
        let ier = self.exchange_requirements.upsert(number.clone(), || {
            InterfaceExchangeRequirement::new(number, String::new())
        });
        merge_scalar(&mut ier.name, name);
        ier
    }

    /// Total number of test cases below this PI.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.exchange_requirements
            .values()
            .map(InterfaceExchangeRequirement::test_case_count)
            .sum()
    }
}

impl Merge for ProgrammaticInterface {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        self.exchange_requirements
            .merge_all(other.exchange_requirements);
    }
}
