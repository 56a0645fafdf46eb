//! Reference resolution.
//!
//! Checks one name against the namespace its reference kind selects. A failed
//! lookup yields a diagnostic listing every visible name, plus a "Did you mean"
//! hint when one is close enough.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::path::NodePath;
use crate::program::Expression;
use crate::scope::{Namespace, ScopeContext, ScopeModel};
use crate::suggest::Suggester;

pub struct Resolver<'a, 'p> {
    model: &'a ScopeModel<'p>,
    suggester: Suggester,
}

impl<'a, 'p> Resolver<'a, 'p> {
    pub fn new(model: &'a ScopeModel<'p>, suggester: Suggester) -> Self {
        Self { model, suggester }
    }

    pub fn model(&self) -> &'a ScopeModel<'p> {
        self.model
    }

    /// Resolve `name` in `namespace`. Returns the diagnostic on failure.
    pub fn check(
        &self,
        namespace: Namespace<'p>,
        name: &str,
        scope: &ScopeContext<'p>,
        path: &NodePath,
    ) -> Option<Diagnostic> {
        if self.model.contains(namespace, scope, name) {
            return None;
        }

        let available = self.model.names(namespace, scope);
        let suggestion = self.suggester.suggest(name, &available);

        Some(Diagnostic::with_details(
            code_for(&namespace),
            unresolved_message(&namespace, name, scope),
            path,
            suggestion,
            Some(available.into_iter().map(str::to_string).collect()),
        ))
    }

    /// References named directly by `expr`. Sub-expressions are left to the walk.
    pub fn check_expression(
        &self,
        expr: &'p Expression,
        scope: &ScopeContext<'p>,
        path: &NodePath,
    ) -> Vec<Diagnostic> {
        match expr {
            Expression::State { name, .. } => {
                self.check(Namespace::State, name, scope, path).into_iter().collect()
            }
            Expression::Param { name, .. } => {
                self.check(Namespace::Param, name, scope, path).into_iter().collect()
            }
            Expression::Import { name, .. } => {
                self.check(Namespace::Import, name, scope, path).into_iter().collect()
            }
            Expression::Style { name, variants } => {
                if let Some(diagnostic) = self.check(Namespace::Style, name, scope, path) {
                    return vec![diagnostic];
                }
                // Only a resolved preset has variant groups to check against
                let Some(preset) = self.model.style(name) else {
                    return Vec::new();
                };
                variants
                    .iter()
                    .flat_map(|variants| variants.keys())
                    .filter_map(|group| {
                        self.check(
                            Namespace::Variant { style: name, preset },
                            group,
                            scope,
                            &path.child("variants").child(group),
                        )
                    })
                    .collect()
            }
            Expression::Lit { .. }
            | Expression::Var { .. }
            | Expression::Route { .. }
            | Expression::Bin { .. }
            | Expression::Not { .. }
            | Expression::Cond { .. }
            | Expression::Get { .. }
            | Expression::Index { .. }
            | Expression::Concat { .. } => Vec::new(),
        }
    }
}

fn code_for(namespace: &Namespace<'_>) -> DiagnosticCode {
    match namespace {
        Namespace::State => DiagnosticCode::UndefinedState,
        Namespace::Action => DiagnosticCode::UndefinedAction,
        Namespace::Style => DiagnosticCode::UndefinedStyle,
        Namespace::Component => DiagnosticCode::ComponentNotFound,
        Namespace::Import => DiagnosticCode::UndefinedImport,
        Namespace::Variant { .. } => DiagnosticCode::UndefinedVariant,
        Namespace::Param => DiagnosticCode::ParamUndefined,
    }
}

fn unresolved_message(namespace: &Namespace<'_>, name: &str, scope: &ScopeContext<'_>) -> String {
    match namespace {
        Namespace::State => format!("Undefined state: '{}'", name),
        Namespace::Action => format!("Undefined action: '{}'", name),
        Namespace::Style => format!("Undefined style: '{}'", name),
        Namespace::Component => format!("Component not found: '{}'", name),
        Namespace::Import => format!("Undefined import: '{}'", name),
        Namespace::Variant { style, .. } => {
            format!("Undefined variant '{}' for style '{}'", name, style)
        }
        Namespace::Param => match scope.enclosing_component() {
            Some(component) => {
                format!("Undefined param '{}' in component '{}'", name, component)
            }
            None => format!(
                "Undefined param '{}': params are only available inside a component view",
                name
            ),
        },
    }
}
