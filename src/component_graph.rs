//! Component reference graph
//!
//! Nodes are component names; an edge `A -> B` means A's view contains a
//! `component` node naming B, at any depth. Only names that resolve to a
//! declared component become edges, so an undefined name is reported once by
//! reference resolution and never shows up here.
//!
//! The graph is built once and serves both reachability and cycle detection.

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::trace;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::path::NodePath;
use crate::program::ComponentNode;
use crate::scope::ScopeModel;
use crate::visitor::{walk_component, ViewVisitor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<'p> {
    pub target: &'p str,
    /// First invocation site of `target` inside the source view
    pub site: NodePath,
}

#[derive(Debug, Default)]
pub struct ComponentGraph<'p> {
    /// Components instantiated by the root view, in discovery order
    roots: Vec<&'p str>,
    /// One entry per declared component, in declaration order
    edges: IndexMap<&'p str, Vec<Edge<'p>>>,
}

impl<'p> ComponentGraph<'p> {
    pub fn build(model: &ScopeModel<'p>) -> Self {
        let program = model.program();

        let mut root_edges = EdgeCollector::new(model);
        root_edges.visit_node(&program.view, &NodePath::view());
        let roots = root_edges.edges.into_iter().map(|edge| edge.target).collect();

        let mut edges = IndexMap::new();
        for (name, def) in program.components.iter().flatten() {
            let mut collector = EdgeCollector::new(model);
            collector.visit_node(&def.view, &NodePath::component_view(name));
            edges.insert(name.as_str(), collector.edges);
        }

        Self { roots, edges }
    }

    pub fn roots(&self) -> &[&'p str] {
        &self.roots
    }

    pub fn edges(&self, name: &str) -> &[Edge<'p>] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Components instantiated from the root view, directly or through other
    /// components, in discovery order.
    pub fn reachable(&self) -> IndexSet<&'p str> {
        let mut reachable = IndexSet::new();
        let mut pending: Vec<&'p str> = self.roots.iter().rev().copied().collect();
        while let Some(name) = pending.pop() {
            if reachable.insert(name) {
                pending.extend(self.edges(name).iter().rev().map(|edge| edge.target));
            }
        }
        reachable
    }

    /// Every elementary cycle, reported once. Components are ranked in search
    /// order: the root view's components first, then every declared component.
    /// A cycle is found from its earliest-ranked member, so the rendering starts
    /// there and rotations of the same cycle are never repeated.
    pub fn find_cycles(&self) -> Vec<ComponentCycle<'p>> {
        let order: IndexSet<&'p str> = self
            .roots
            .iter()
            .chain(self.edges.keys())
            .copied()
            .collect();
        let mut cycles = Vec::new();

        for (rank, &start) in order.iter().enumerate() {
            self.cycles_from(start, rank, &order, &mut cycles);
        }

        cycles
    }

    /// Depth-first search over simple paths from `start`, through components
    /// ranked after it. An edge back to `start` closes a cycle.
    fn cycles_from(
        &self,
        start: &'p str,
        rank: usize,
        order: &IndexSet<&'p str>,
        cycles: &mut Vec<ComponentCycle<'p>>,
    ) {
        // (component, index of the next outgoing edge to follow)
        let mut frames: Vec<(&'p str, usize)> = vec![(start, 0)];

        while let Some(frame) = frames.last_mut() {
            let (name, next) = *frame;
            let Some(edge) = self.edges(name).get(next) else {
                frames.pop();
                continue;
            };
            frame.1 += 1;

            if edge.target == start {
                let mut members: Vec<&'p str> = frames.iter().map(|(n, _)| *n).collect();
                members.push(start);
                let cycle = ComponentCycle {
                    members,
                    site: edge.site.clone(),
                };
                trace!(cycle = %cycle.render(), site = %cycle.site, "component cycle");
                cycles.push(cycle);
            } else if order
                .get_index_of(edge.target)
                .is_some_and(|target_rank| target_rank > rank)
                && !frames.iter().any(|(n, _)| *n == edge.target)
            {
                frames.push((edge.target, 0));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CYCLES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCycle<'p> {
    /// Closed path: the first member is repeated at the end
    pub members: Vec<&'p str>,
    /// Invocation site of the edge that closes the cycle
    pub site: NodePath,
}

impl ComponentCycle<'_> {
    pub fn render(&self) -> String {
        self.members.join(" -> ")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::ComponentCycle,
            format!("Circular component reference detected: {}", self.render()),
            &self.site,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EDGE COLLECTION
// ═══════════════════════════════════════════════════════════════════════════════

struct EdgeCollector<'a, 'p> {
    model: &'a ScopeModel<'p>,
    seen: HashSet<&'p str>,
    edges: Vec<Edge<'p>>,
}

impl<'a, 'p> EdgeCollector<'a, 'p> {
    fn new(model: &'a ScopeModel<'p>) -> Self {
        Self {
            model,
            seen: HashSet::new(),
            edges: Vec::new(),
        }
    }
}

impl<'a, 'p> ViewVisitor<'p> for EdgeCollector<'a, 'p> {
    fn visit_component(&mut self, component: &'p ComponentNode, path: &NodePath) {
        let name = component.name.as_str();
        if self.model.component(name).is_some() && self.seen.insert(name) {
            self.edges.push(Edge {
                target: name,
                site: path.clone(),
            });
        }
        // Slot children are part of this view too
        walk_component(self, component, path);
    }
}
