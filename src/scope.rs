//! Scope model
//!
//! Two namespaces exist:
//! - **global**: state, actions, styles, components and imports, visible everywhere
//! - **local**: the parameters of the component whose view is being walked
//!
//! Params never leak between components and never fall back to globals.

use indexmap::IndexSet;

use crate::program::{ComponentDef, Program, StylePreset};

// ═══════════════════════════════════════════════════════════════════════════════
// NAMESPACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Which set of names a reference is resolved against.
#[derive(Debug, Clone, Copy)]
pub enum Namespace<'p> {
    State,
    Action,
    Style,
    Component,
    Import,
    /// Variant groups declared by one style preset
    Variant {
        style: &'p str,
        preset: &'p StylePreset,
    },
    /// Params of the enclosing component, if any
    Param,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPE CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Where the walk currently is: at top level, or inside one component's view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeContext<'p> {
    component: Option<(&'p str, &'p ComponentDef)>,
}

impl<'p> ScopeContext<'p> {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn component(name: &'p str, def: &'p ComponentDef) -> Self {
        Self {
            component: Some((name, def)),
        }
    }

    pub fn enclosing_component(&self) -> Option<&'p str> {
        self.component.map(|(name, _)| name)
    }

    pub fn is_inside_component(&self) -> bool {
        self.component.is_some()
    }

    pub fn param_names(&self) -> Vec<&'p str> {
        self.component
            .map(|(_, def)| def.param_names())
            .unwrap_or_default()
    }

    fn has_param(&self, name: &str) -> bool {
        self.component
            .and_then(|(_, def)| def.params.as_ref())
            .is_some_and(|params| params.contains_key(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPE MODEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Global name inventory of a program. Every set keeps declaration order.
#[derive(Debug)]
pub struct ScopeModel<'p> {
    program: &'p Program,
    state_names: IndexSet<&'p str>,
    action_names: IndexSet<&'p str>,
    style_names: IndexSet<&'p str>,
    component_names: IndexSet<&'p str>,
    import_names: IndexSet<&'p str>,
}

impl<'p> ScopeModel<'p> {
    /// A missing section (no `styles` map at all) is an empty namespace.
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            state_names: program.state.keys().map(String::as_str).collect(),
            action_names: program.actions.iter().map(|a| a.name.as_str()).collect(),
            style_names: program
                .styles
                .iter()
                .flat_map(|styles| styles.keys().map(String::as_str))
                .collect(),
            component_names: program
                .components
                .iter()
                .flat_map(|components| components.keys().map(String::as_str))
                .collect(),
            import_names: program
                .imports
                .iter()
                .flat_map(|imports| imports.keys().map(String::as_str))
                .collect(),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn component(&self, name: &str) -> Option<&'p ComponentDef> {
        self.program.components.as_ref()?.get(name)
    }

    pub fn style(&self, name: &str) -> Option<&'p StylePreset> {
        self.program.styles.as_ref()?.get(name)
    }

    pub fn contains(&self, namespace: Namespace<'p>, scope: &ScopeContext<'p>, name: &str) -> bool {
        match namespace {
            Namespace::State => self.state_names.contains(name),
            Namespace::Action => self.action_names.contains(name),
            Namespace::Style => self.style_names.contains(name),
            Namespace::Component => self.component_names.contains(name),
            Namespace::Import => self.import_names.contains(name),
            Namespace::Variant { preset, .. } => preset
                .variants
                .as_ref()
                .is_some_and(|variants| variants.contains_key(name)),
            Namespace::Param => scope.has_param(name),
        }
    }

    /// Every name visible in `namespace`, in declaration order.
    pub fn names(&self, namespace: Namespace<'p>, scope: &ScopeContext<'p>) -> Vec<&'p str> {
        match namespace {
            Namespace::State => self.state_names.iter().copied().collect(),
            Namespace::Action => self.action_names.iter().copied().collect(),
            Namespace::Style => self.style_names.iter().copied().collect(),
            Namespace::Component => self.component_names.iter().copied().collect(),
            Namespace::Import => self.import_names.iter().copied().collect(),
            Namespace::Variant { preset, .. } => preset.variant_groups(),
            Namespace::Param => scope.param_names(),
        }
    }

    pub fn component_names(&self) -> impl Iterator<Item = &'p str> + '_ {
        self.component_names.iter().copied()
    }
}
