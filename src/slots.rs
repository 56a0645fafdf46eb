use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::path::NodePath;
use crate::program::SlotNode;
use crate::scope::ScopeContext;

/// A slot is only meaningful inside a component definition's view, where the
/// caller's children get projected into it.
pub fn check_slot_context(
    slot: &SlotNode,
    scope: &ScopeContext<'_>,
    path: &NodePath,
) -> Option<Diagnostic> {
    if scope.is_inside_component() {
        return None;
    }

    let message = match &slot.name {
        Some(name) => format!(
            "Misplaced slot '{}': slot nodes may only appear inside a component definition's view",
            name
        ),
        None => "Misplaced slot: slot nodes may only appear inside a component definition's view"
            .to_string(),
    };
    Some(Diagnostic::new(
        DiagnosticCode::SlotOutsideComponent,
        message,
        path,
    ))
}
