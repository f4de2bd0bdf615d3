//! Grouping levels of the requirement (SREQ) hierarchy.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    Key, Requirement,
    merge::{Merge, Upsert, merge_scalar},
};

/// An exchange point (EP) grouping requirements under a technical interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangePoint {
    /// Exchange point number.
    pub number: Key,
    /// Exchange point name.
    pub name: String,
    /// Requirements keyed by requirement number.
    pub requirements: BTreeMap<Key, Requirement>,
}

impl ExchangePoint {
    /// Creates an empty exchange point.
    #[must_use]
    pub const fn new(number: Key, name: String) -> Self {
        Self {
            number,
            name,
            requirements: BTreeMap::new(),
        }
    }

    /// Total number of test cases below this exchange point.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.requirements
            .values()
            .map(Requirement::test_case_count)
            .sum()
    }
}

impl Merge for ExchangePoint {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        self.requirements.merge_all(other.requirements);
    }
}

/// A technical interface (TIN) beneath a system interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalInterface {
    /// Technical interface number.
    pub number: Key,
    /// Technical interface name.
    pub name: String,
    /// Exchange points keyed by EP number.
    pub exchange_points: BTreeMap<Key, ExchangePoint>,
}

impl TechnicalInterface {
    /// Creates an empty technical interface.
    #[must_use]
    pub const fn new(number: Key, name: String) -> Self {
        Self {
            number,
            name,
            exchange_points: BTreeMap::new(),
        }
    }

    /// Returns the exchange point with the given number, creating it if
    /// needed.
    pub fn upsert_exchange_point(&mut self, number: Key, name: String) -> &mut ExchangePoint {
        let ep = self
            .exchange_points
            .upsert(number.clone(), || ExchangePoint::new(number, String::new()));
        merge_scalar(&mut ep.name, name);
        ep
    }

    /// Total number of test cases below this technical interface.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.exchange_points
            .values()
            .map(ExchangePoint::test_case_count)
            .sum()
    }
}

impl Merge for TechnicalInterface {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        self.exchange_points.merge_all(other.exchange_points);
    }
}

/// A function grouping requirements, the alternative to the TIN/EP grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    /// Function name; also its key.
    pub name: Key,
    /// Requirements keyed by requirement number.
    pub requirements: BTreeMap<Key, Requirement>,
}

impl Function {
    /// Creates an empty function.
    #[must_use]
    pub const fn new(name: Key) -> Self {
        Self {
            name,
            requirements: BTreeMap::new(),
        }
    }

    /// Total number of test cases below this function.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.requirements
            .values()
            .map(Requirement::test_case_count)
            .sum()
    }
}

impl Merge for Function {
    fn merge(&mut self, other: Self) {
        self.requirements.merge_all(other.requirements);
    }
}

/// A system interface (SI), the top grouping of requirements.
///
/// The TIN view and the function view are held side by side; they are two
/// projections of the same records, built independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInterface {
    /// System interface number.
    pub number: Key,
    /// System interface name.
    pub name: String,
    /// Technical interfaces keyed by TIN number.
    pub technical_interfaces: BTreeMap<Key, TechnicalInterface>,
    /// Functions keyed by function name.
    pub functions: BTreeMap<Key, Function>,
}

impl SystemInterface {
    /// Creates an empty system interface.
    #[must_use]
    pub const fn new(number: Key, name: String) -> Self {
        Self {
            number,
            name,
            technical_interfaces: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    /// Returns the technical interface with the given number, creating it if
    /// needed.
    pub fn upsert_technical_interface(
        &mut self,
        number: Key,
        name: String,
    ) -> &mut TechnicalInterface {
        let tin = self
            .technical_interfaces
            .upsert(number.clone(), || TechnicalInterface::new(number, String::new()));
        merge_scalar(&mut tin.name, name);
        tin
    }

    /// Returns the function with the given name, creating it if needed.
    pub fn upsert_function(&mut self, name: Key) -> &mut Function {
        self.functions.upsert(name.clone(), || Function::new(name))
    }

    /// Test cases below this SI in the TIN view.
    #[must_use]
    pub fn tin_test_case_count(&self) -> usize {
        self.technical_interfaces
            .values()
            .map(TechnicalInterface::test_case_count)
            .sum()
    }

    /// Test cases below this SI in the function view.
    #[must_use]
    pub fn function_test_case_count(&self) -> usize {
        self.functions.values().map(Function::test_case_count).sum()
    }
}

impl Merge for SystemInterface {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        self.technical_interfaces
            .merge_all(other.technical_interfaces);
        self.functions.merge_all(other.functions);
    }
}
