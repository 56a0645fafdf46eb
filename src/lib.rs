//! # UI Program Analyzer Ground Truth
//!
//! ## Resolution Invariants
//!
//! 1. **Single Pass**: `analyze` walks the root view, every component view, every
//!    action and every lifecycle hook exactly once. All defects are collected;
//!    nothing short-circuits.
//!
//! 2. **Namespaces**: A reference is resolved against exactly one namespace,
//!    selected by its kind:
//!    - `state`, actions, styles, components and imports are global
//!    - `param` resolves only against the enclosing component's params
//!    - style variant keys resolve against the named preset's groups
//!
//! 3. **No Leaking**: Params are visible only inside the view of the component
//!    that declares them. Slot children passed at an invocation site are resolved
//!    in the caller's scope, not the callee's.
//!
//! 4. **Diagnostics**: Every unresolved reference lists the names that were
//!    available and, when one is within the suggestion threshold, a
//!    `Did you mean 'x'?` hint. Each diagnostic carries a path into the program.
//!
//! 5. **Cycles**: Each distinct cycle in the component reference graph yields
//!    one `COMPONENT_CYCLE`. Undefined components are reported once, by resolution,
//!    and never take part in cycle detection.
//!
//! 6. **Determinism**: The same program always yields the same diagnostics, in
//!    the same order, with the same paths.

mod analyze;
mod cache;
mod component_graph;
mod diagnostic;
mod error;
mod path;
mod program;
mod props;
mod resolve;
mod scope;
mod slots;
mod suggest;
mod visitor;


pub use analyze::{
    analyze, analyze_batch, analyze_source, analyze_with_options, collect_diagnostics,
    AnalyzeOptions,
};
#[cfg(feature = "napi")]
pub use analyze::{analyze_program_native, analyze_programs_native};
pub use cache::{AnalysisCache, DEFAULT_CACHE_CAPACITY};
pub use component_graph::{ComponentCycle, ComponentGraph, Edge};
pub use diagnostic::*;
pub use error::AnalyzeError;
pub use path::NodePath;
pub use program::*;
pub use props::check_required_props;
pub use resolve::Resolver;
pub use scope::{Namespace, ScopeContext, ScopeModel};
pub use slots::check_slot_context;
pub use suggest::{levenshtein, Suggester, DEFAULT_SUGGESTION_THRESHOLD};
pub use visitor::{
    walk_children, walk_code, walk_component, walk_each, walk_element, walk_event,
    walk_expression, walk_if, walk_node, walk_props, walk_step, walk_steps, walk_text,
    ViewVisitor,
};
