//! Analyzer entry point
//!
//! One pass over every reachable tree of a program: the root view, each
//! component's view (with that component as the param scope), every action's
//! steps, the lifecycle hooks and the style presets. Diagnostics from all
//! checks are collected; nothing short-circuits.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::component_graph::{ComponentCycle, ComponentGraph};
use crate::diagnostic::{AnalyzeResult, Diagnostic};
use crate::error::AnalyzeError;
use crate::path::NodePath;
use crate::program::{
    ActionDef, ActionStep, ComponentNode, EventHandler, Expression, LifecycleHooks, Program,
    SlotNode, StylePreset, ViewNode,
};
use crate::props::check_required_props;
use crate::resolve::Resolver;
use crate::scope::{Namespace, ScopeContext, ScopeModel};
use crate::slots::check_slot_context;
use crate::suggest::{Suggester, DEFAULT_SUGGESTION_THRESHOLD};
use crate::visitor::{
    walk_component, walk_event, walk_expression, walk_step, walk_steps, ViewVisitor,
};

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    /// Largest edit distance that still produces a "Did you mean" hint
    pub suggestion_threshold: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
        }
    }
}

impl AnalyzeOptions {
    pub fn from_json(json: &str) -> Result<Self, AnalyzeError> {
        serde_json::from_str(json).map_err(AnalyzeError::Options)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn analyze(program: &Program) -> AnalyzeResult {
    analyze_with_options(program, &AnalyzeOptions::default())
}

pub fn analyze_with_options(program: &Program, options: &AnalyzeOptions) -> AnalyzeResult {
    AnalyzeResult::from_diagnostics(collect_diagnostics(program, options))
}

/// Parse a JSON program and analyze it.
pub fn analyze_source(source: &str, options: &AnalyzeOptions) -> Result<AnalyzeResult, AnalyzeError> {
    let program: Program = serde_json::from_str(source).map_err(AnalyzeError::Program)?;
    Ok(analyze_with_options(&program, options))
}

/// Analyze independent programs in parallel. Results keep input order.
pub fn analyze_batch(programs: &[Program], options: &AnalyzeOptions) -> Vec<AnalyzeResult> {
    programs
        .par_iter()
        .map(|program| analyze_with_options(program, options))
        .collect()
}

/// Every diagnostic for `program`, in walk order: views, actions, lifecycle
/// hooks, style presets, then component cycles.
pub fn collect_diagnostics(program: &Program, options: &AnalyzeOptions) -> Vec<Diagnostic> {
    let component_count = program.components.as_ref().map_or(0, |c| c.len());
    let _span = debug_span!(
        "analyze",
        components = component_count,
        actions = program.actions.len()
    )
    .entered();

    let model = ScopeModel::new(program);
    let resolver = Resolver::new(&model, Suggester::new(options.suggestion_threshold));
    let mut walker = AnalysisWalker::new(&resolver);

    walker.walk_view(&program.view, ScopeContext::global(), &NodePath::view());
    for (name, def) in program.components.iter().flatten() {
        walker.walk_view(
            &def.view,
            ScopeContext::component(name, def),
            &NodePath::component_view(name),
        );
    }
    debug!(diagnostics = walker.diagnostics.len(), "views walked");

    walker.walk_actions(&program.actions);
    if let Some(hooks) = &program.lifecycle {
        walker.walk_lifecycle(hooks);
    }
    for (name, preset) in program.styles.iter().flatten() {
        walker.check_default_variants(name, preset);
    }
    let mut diagnostics = walker.diagnostics;

    let graph = ComponentGraph::build(&model);
    let reachable = graph.reachable();
    for name in model.component_names() {
        if !reachable.contains(name) {
            trace!(component = name, "component is declared but never instantiated");
        }
    }
    diagnostics.extend(graph.find_cycles().iter().map(ComponentCycle::to_diagnostic));

    debug!(diagnostics = diagnostics.len(), "analysis finished");
    diagnostics
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs every per-node check in a single traversal. `scope` is set once per
/// root and stays fixed while that root is walked.
struct AnalysisWalker<'r, 'm, 'p> {
    resolver: &'r Resolver<'m, 'p>,
    scope: ScopeContext<'p>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r, 'm, 'p> AnalysisWalker<'r, 'm, 'p> {
    fn new(resolver: &'r Resolver<'m, 'p>) -> Self {
        Self {
            resolver,
            scope: ScopeContext::global(),
            diagnostics: Vec::new(),
        }
    }

    fn walk_view(&mut self, view: &'p ViewNode, scope: ScopeContext<'p>, path: &NodePath) {
        self.scope = scope;
        self.visit_node(view, path);
    }

    fn walk_actions(&mut self, actions: &'p [ActionDef]) {
        self.scope = ScopeContext::global();
        for (i, action) in actions.iter().enumerate() {
            walk_steps(self, &action.steps, &NodePath::root().indexed("actions", i), "steps");
        }
    }

    fn walk_lifecycle(&mut self, hooks: &LifecycleHooks) {
        let path = NodePath::root().child("lifecycle");
        for (hook, action) in hooks.bound() {
            self.diagnostics.extend(self.resolver.check(
                Namespace::Action,
                action,
                &ScopeContext::global(),
                &path.child(hook),
            ));
        }
    }

    /// A preset's defaults may only name its own variant groups.
    fn check_default_variants(&mut self, name: &'p str, preset: &'p StylePreset) {
        let path = NodePath::root()
            .child("styles")
            .child(name)
            .child("defaultVariants");
        for group in preset.default_variants.iter().flat_map(|d| d.keys()) {
            self.diagnostics.extend(self.resolver.check(
                Namespace::Variant { style: name, preset },
                group,
                &ScopeContext::global(),
                &path.child(group),
            ));
        }
    }
}

impl<'r, 'm, 'p> ViewVisitor<'p> for AnalysisWalker<'r, 'm, 'p> {
    fn visit_component(&mut self, component: &'p ComponentNode, path: &NodePath) {
        match self
            .resolver
            .check(Namespace::Component, &component.name, &self.scope, path)
        {
            Some(diagnostic) => self.diagnostics.push(diagnostic),
            None => {
                if let Some(callee) = self.resolver.model().component(&component.name) {
                    self.diagnostics
                        .extend(check_required_props(component, callee, path));
                }
            }
        }
        walk_component(self, component, path);
    }

    fn visit_slot(&mut self, slot: &'p SlotNode, path: &NodePath) {
        self.diagnostics
            .extend(check_slot_context(slot, &self.scope, path));
    }

    fn visit_event(&mut self, handler: &'p EventHandler, path: &NodePath) {
        self.diagnostics.extend(self.resolver.check(
            Namespace::Action,
            &handler.action,
            &self.scope,
            path,
        ));
        walk_event(self, handler, path);
    }

    fn visit_expression(&mut self, expr: &'p Expression, path: &NodePath) {
        self.diagnostics
            .extend(self.resolver.check_expression(expr, &self.scope, path));
        walk_expression(self, expr, path);
    }

    fn visit_step(&mut self, step: &'p ActionStep, path: &NodePath) {
        match step {
            ActionStep::Set { target, .. } | ActionStep::Update { target, .. } => {
                self.diagnostics.extend(self.resolver.check(
                    Namespace::State,
                    target,
                    &self.scope,
                    &path.child("target"),
                ));
            }
            ActionStep::Fetch { .. } | ActionStep::Navigate { .. } => {}
        }
        walk_step(self, step, path);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
lazy_static::lazy_static! {
    static ref NATIVE_CACHE: crate::cache::AnalysisCache = crate::cache::AnalysisCache::new();
}

#[cfg(feature = "napi")]
fn native_options(options_json: Option<String>) -> napi::Result<AnalyzeOptions> {
    options_json
        .map(|json| AnalyzeOptions::from_json(&json))
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
fn native_result(result: AnalyzeResult) -> napi::Result<serde_json::Value> {
    serde_json::to_value(result)
        .map_err(|e| napi::Error::from_reason(AnalyzeError::Serialize(e).to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn analyze_program_native(
    program_json: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = native_options(options_json)?;
    let result = NATIVE_CACHE
        .get_or_analyze(&program_json, &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    native_result(result)
}

#[cfg(feature = "napi")]
#[napi]
pub fn analyze_programs_native(
    programs_json: Vec<String>,
    options_json: Option<String>,
) -> napi::Result<Vec<serde_json::Value>> {
    let options = native_options(options_json)?;
    let results = programs_json
        .par_iter()
        .map(|source| NATIVE_CACHE.get_or_analyze(source, &options))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    results.into_iter().map(native_result).collect()
}
