use serde::Serialize;

use crate::domain::{
    CoverageRoot, ExchangePoint, Function, InterfaceExchangeRequirement, ProgrammaticInterface,
    Requirement, Service, SystemInterface, TechnicalInterface, TestCase,
};

/// Which projection of a [`CoverageRoot`] to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum View {
    /// SI → TIN → EP → requirement → test case.
    #[default]
    Tin,
    /// SI → function → requirement → test case.
    Function,
    /// PI → IER → service → test case.
    Ier,
}

/// The entity a node of the outline stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// A system interface.
    SystemInterface,
    /// A technical interface.
    TechnicalInterface,
    /// An exchange point.
    ExchangePoint,
    /// A function.
    Function,
    /// A requirement.
    Requirement,
    /// A programmatic interface.
    ProgrammaticInterface,
    /// An interface exchange requirement.
    ExchangeRequirement,
    /// A resolved service under an IER.
    Service,
    /// A test case (always a leaf).
    TestCase,
}

/// A rendered node: the entity's identity plus its subtree statistics.
///
/// `zero_count` is exposed as data, not formatting, so each consumer can
/// highlight gaps its own way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// What the node stands for.
    pub kind: NodeKind,
    /// Business key of the entity (the service name for services).
    pub key: String,
    /// Display name of the entity; may be empty.
    pub name: String,
    /// Number of test cases in this subtree. A test case counts itself.
    pub count: usize,
    /// `true` when the subtree holds no test case at all.
    pub zero_count: bool,
    /// Child nodes in ascending key order.
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn branch(kind: NodeKind, key: &str, name: &str, children: Vec<Self>) -> Self {
        let count = children.iter().map(|child| child.count).sum();
        Self {
            kind,
            key: key.to_string(),
            name: name.to_string(),
            count,
            zero_count: count == 0,
            children,
        }
    }

    fn leaf(test_case: &TestCase) -> Self {
        Self {
            kind: NodeKind::TestCase,
            key: test_case.key.to_string(),
            name: test_case.name.clone(),
            count: 1,
            zero_count: false,
            children: Vec::new(),
        }
    }

    /// `<key> <name>`, or just the key when the name is empty.
    #[must_use]
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.key.clone()
        } else {
            format!("{} {}", self.key, self.name)
        }
    }

    /// Depth-first, pre-order walk over this node and its descendants.
    #[must_use]
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(Self::walk)))
    }
}

/// A deterministic, render-ready tree for one view of a [`CoverageRoot`].
///
/// Children are ordered by ascending key at every level, so the same root
/// always yields the same outline regardless of how it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// The projection this outline shows.
    pub view: View,
    /// Top-level nodes (SIs, or PIs for the IER view).
    pub nodes: Vec<OutlineNode>,
}

impl Outline {
    /// Builds the outline of one view.
    #[must_use]
    pub fn build(root: &CoverageRoot, view: View) -> Self {
        let nodes = match view {
            View::Tin => root
                .system_interfaces
                .values()
                .filter(|si| !si.technical_interfaces.is_empty())
                .map(tin_view)
                .collect(),
            View::Function => root
                .system_interfaces
                .values()
                .filter(|si| !si.functions.is_empty())
                .map(function_view)
                .collect(),
            View::Ier => root
                .programmatic_interfaces
                .values()
                .map(programmatic_interface)
                .collect(),
        };
        Self { view, nodes }
    }

    /// Total number of test cases in the outline.
    #[must_use]
    pub fn total(&self) -> usize {
        self.nodes.iter().map(|node| node.count).sum()
    }

    /// Every node flagged as zero-count, in rendering order.
    pub fn zero_count_nodes(&self) -> impl Iterator<Item = &OutlineNode> {
        self.nodes
            .iter()
            .flat_map(OutlineNode::walk)
            .filter(|node| node.zero_count)
    }
}

fn tin_view(si: &SystemInterface) -> OutlineNode {
    let children = si
        .technical_interfaces
        .values()
        .map(technical_interface)
        .collect();
    OutlineNode::branch(NodeKind::SystemInterface, &si.number, &si.name, children)
}

fn function_view(si: &SystemInterface) -> OutlineNode {
    let children = si.functions.values().map(function).collect();
    OutlineNode::branch(NodeKind::SystemInterface, &si.number, &si.name, children)
}

fn technical_interface(tin: &TechnicalInterface) -> OutlineNode {
    let children = tin.exchange_points.values().map(exchange_point).collect();
    OutlineNode::branch(NodeKind::TechnicalInterface, &tin.number, &tin.name, children)
}

fn exchange_point(ep: &ExchangePoint) -> OutlineNode {
    OutlineNode::branch(
        NodeKind::ExchangePoint,
        &ep.number,
        &ep.name,
        requirements(ep.requirements.values()),
    )
}

fn function(function: &Function) -> OutlineNode {
    OutlineNode::branch(
        NodeKind::Function,
        &function.name,
        "",
        requirements(function.requirements.values()),
    )
}

fn requirements<'a>(requirements: impl Iterator<Item = &'a Requirement>) -> Vec<OutlineNode> {
    requirements
        .map(|requirement| {
            OutlineNode::branch(
                NodeKind::Requirement,
                &requirement.number,
                &requirement.name,
                test_cases(requirement.test_cases.values()),
            )
        })
        .collect()
}

fn programmatic_interface(pi: &ProgrammaticInterface) -> OutlineNode {
    let children = pi
        .exchange_requirements
        .values()
        .map(exchange_requirement)
        .collect();
    OutlineNode::branch(NodeKind::ProgrammaticInterface, &pi.number, &pi.name, children)
}

fn exchange_requirement(ier: &InterfaceExchangeRequirement) -> OutlineNode {
    let children = ier.services.values().map(service).collect();
    OutlineNode::branch(NodeKind::ExchangeRequirement, &ier.number, &ier.name, children)
}

fn service(service: &Service) -> OutlineNode {
    OutlineNode::branch(
        NodeKind::Service,
        &service.name,
        "",
        test_cases(service.test_cases.values()),
    )
}

fn test_cases<'a>(test_cases: impl Iterator<Item = &'a TestCase>) -> Vec<OutlineNode> {
    test_cases.map(OutlineNode::leaf).collect()
}
