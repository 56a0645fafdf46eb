//! Program IR
//!
//! The declarative tree the analyzer consumes. Shapes mirror the JSON emitted by
//! the loader stage; every map keeps declaration order because diagnostics list
//! available names in that order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRAM
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub state: IndexMap<String, StateDecl>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub components: Option<IndexMap<String, ComponentDef>>,
    #[serde(default)]
    pub styles: Option<IndexMap<String, StylePreset>>,
    #[serde(default)]
    pub imports: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub lifecycle: Option<LifecycleHooks>,
    pub view: ViewNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDecl {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub initial: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<ActionStep>,
}

/// Action names bound to page lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleHooks {
    pub on_mount: Option<String>,
    pub on_unmount: Option<String>,
    pub on_route_enter: Option<String>,
    pub on_route_leave: Option<String>,
}

impl LifecycleHooks {
    /// Bound hooks in a fixed order, paired with their wire names.
    pub fn bound(&self) -> Vec<(&'static str, &str)> {
        [
            ("onMount", &self.on_mount),
            ("onUnmount", &self.on_unmount),
            ("onRouteEnter", &self.on_route_enter),
            ("onRouteLeave", &self.on_route_leave),
        ]
        .into_iter()
        .filter_map(|(hook, action)| action.as_deref().map(|a| (hook, a)))
        .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS & STYLES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDef {
    #[serde(default)]
    pub params: Option<IndexMap<String, ParamDef>>,
    pub view: ViewNode,
}

impl ComponentDef {
    /// Declared parameter names, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .flat_map(|params| params.keys().map(String::as_str))
            .collect()
    }

    /// Parameters a caller must supply. `required` defaults to true.
    pub fn required_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .flat_map(|params| params.iter())
            .filter(|(_, def)| def.is_required())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub required: Option<bool>,
}

impl ParamDef {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub base: String,
    /// group name -> (variant value -> class string)
    #[serde(default)]
    pub variants: Option<IndexMap<String, IndexMap<String, String>>>,
    #[serde(default)]
    pub default_variants: Option<IndexMap<String, String>>,
}

impl StylePreset {
    pub fn variant_groups(&self) -> Vec<&str> {
        self.variants
            .iter()
            .flat_map(|variants| variants.keys().map(String::as_str))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewNode {
    Element(ElementNode),
    Text(TextNode),
    If(IfNode),
    Each(EachNode),
    Component(ComponentNode),
    Slot(SlotNode),
    Code(CodeNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub props: Option<IndexMap<String, PropValue>>,
    #[serde(default)]
    pub children: Vec<ViewNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub value: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfNode {
    pub condition: Expression,
    #[serde(rename = "then")]
    pub then_branch: Box<ViewNode>,
    #[serde(rename = "else", default)]
    pub else_branch: Option<Box<ViewNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EachNode {
    pub items: Expression,
    #[serde(rename = "as")]
    pub item_var: String,
    #[serde(rename = "index", default)]
    pub index_var: Option<String>,
    #[serde(default)]
    pub key: Option<Expression>,
    pub body: Box<ViewNode>,
}

/// Invocation of a component declared in `Program::components`.
/// `children` fill the callee's slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub name: String,
    #[serde(default)]
    pub props: Option<IndexMap<String, PropValue>>,
    #[serde(default)]
    pub children: Vec<ViewNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotNode {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeNode {
    pub language: Expression,
    pub content: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Event(EventHandler),
    Expression(Expression),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandler {
    pub event: String,
    pub action: String,
    #[serde(default)]
    pub payload: Option<Expression>,
    #[serde(default)]
    pub debounce: Option<u64>,
    #[serde(default)]
    pub throttle: Option<u64>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "lowercase")]
pub enum Expression {
    Lit {
        value: serde_json::Value,
    },
    State {
        name: String,
        #[serde(default)]
        path: Option<String>,
    },
    /// Loop or event-local binding. Not resolved against any namespace.
    Var {
        name: String,
        #[serde(default)]
        path: Option<String>,
    },
    Param {
        name: String,
        #[serde(default)]
        path: Option<String>,
    },
    Import {
        name: String,
        #[serde(default)]
        path: Option<String>,
    },
    Route {
        name: String,
        #[serde(default)]
        source: Option<String>,
    },
    Bin {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        operand: Box<Expression>,
    },
    Cond {
        #[serde(rename = "if")]
        condition: Box<Expression>,
        #[serde(rename = "then")]
        then_branch: Box<Expression>,
        #[serde(rename = "else")]
        else_branch: Box<Expression>,
    },
    Get {
        base: Box<Expression>,
        path: String,
    },
    Index {
        base: Box<Expression>,
        key: Box<Expression>,
    },
    Concat {
        items: Vec<Expression>,
    },
    Style {
        name: String,
        #[serde(default)]
        variants: Option<IndexMap<String, Expression>>,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACTION STEPS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "lowercase")]
pub enum ActionStep {
    Set {
        target: String,
        value: Expression,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        target: String,
        operation: String,
        #[serde(default)]
        value: Option<Expression>,
        #[serde(default)]
        index: Option<Expression>,
        #[serde(default)]
        delete_count: Option<Expression>,
    },
    #[serde(rename_all = "camelCase")]
    Fetch {
        url: Expression,
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        body: Option<Expression>,
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        on_success: Vec<ActionStep>,
        #[serde(default)]
        on_error: Vec<ActionStep>,
    },
    Navigate {
        url: Expression,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_view_node_kinds_deserialize() {
        let node: ViewNode = serde_json::from_value(json!({
            "kind": "element",
            "tag": "div",
            "children": [
                { "kind": "text", "value": { "expr": "lit", "value": "hi" } },
                {
                    "kind": "if",
                    "condition": { "expr": "state", "name": "open" },
                    "then": { "kind": "slot" },
                    "else": { "kind": "code",
                              "language": { "expr": "lit", "value": "rust" },
                              "content": { "expr": "lit", "value": "fn main() {}" } }
                },
                {
                    "kind": "each",
                    "items": { "expr": "state", "name": "todos" },
                    "as": "todo",
                    "index": "i",
                    "body": { "kind": "component", "name": "Row" }
                }
            ]
        }))
        .unwrap();

        let ViewNode::Element(el) = node else {
            panic!("expected element");
        };
        assert_eq!(el.tag, "div");
        assert_eq!(el.children.len(), 3);
        assert!(matches!(el.children[1], ViewNode::If(ref n) if n.else_branch.is_some()));
        assert!(matches!(
            el.children[2],
            ViewNode::Each(ref n) if n.item_var == "todo" && n.index_var.as_deref() == Some("i")
        ));
    }

    #[test]
    fn test_prop_value_event_vs_expression() {
        let props: IndexMap<String, PropValue> = serde_json::from_value(json!({
            "onClick": { "event": "click", "action": "increment" },
            "class": { "expr": "style", "name": "button", "variants": {
                "size": { "expr": "lit", "value": "lg" }
            } }
        }))
        .unwrap();

        assert!(matches!(props["onClick"], PropValue::Event(ref h) if h.action == "increment"));
        assert!(matches!(
            props["class"],
            PropValue::Expression(Expression::Style { ref name, .. }) if name == "button"
        ));
    }

    #[test]
    fn test_required_defaults_to_true() {
        let def: ComponentDef = serde_json::from_value(json!({
            "params": {
                "label": { "type": "string" },
                "icon": { "type": "string", "required": false },
                "size": { "type": "string", "required": true }
            },
            "view": { "kind": "slot" }
        }))
        .unwrap();

        assert_eq!(def.param_names(), vec!["label", "icon", "size"]);
        assert_eq!(def.required_params(), vec!["label", "size"]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<ViewNode, _> = serde_json::from_value(json!({ "kind": "portal" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_lifecycle_bound_hooks_in_order() {
        let hooks = LifecycleHooks {
            on_unmount: Some("cleanup".to_string()),
            on_mount: Some("load".to_string()),
            ..Default::default()
        };
        assert_eq!(hooks.bound(), vec![("onMount", "load"), ("onUnmount", "cleanup")]);
    }
}
