//! Required-prop checks for component invocations.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::path::NodePath;
use crate::program::{ComponentDef, ComponentNode};

/// One diagnostic per required param of `callee` that `node` does not supply,
/// in the callee's declaration order. An absent prop map supplies nothing.
pub fn check_required_props(
    node: &ComponentNode,
    callee: &ComponentDef,
    path: &NodePath,
) -> Vec<Diagnostic> {
    callee
        .required_params()
        .into_iter()
        .filter(|param| {
            !node
                .props
                .as_ref()
                .is_some_and(|props| props.contains_key(*param))
        })
        .map(|param| {
            Diagnostic::new(
                DiagnosticCode::ComponentPropMissing,
                format!(
                    "Missing required prop '{}' for component '{}'",
                    param, node.name
                ),
                path,
            )
        })
        .collect()
}
