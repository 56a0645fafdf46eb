use indexmap::IndexMap;

use crate::path::NodePath;
use crate::program::{
    ActionStep, CodeNode, ComponentNode, EachNode, ElementNode, EventHandler, Expression, IfNode,
    PropValue, SlotNode, TextNode, ViewNode,
};

/// The ViewVisitor trait is the single traversal mechanism for view trees,
/// expressions and action steps.
///
/// Rules:
/// 1. Traversal is pre-order, left-to-right, parent before children.
/// 2. Every `visit_*` receives the address of the thing it visits.
/// 3. Implementers override `visit_*` methods to add behavior and call the
///    matching `walk_*` function to continue, unless pruning is intended.
/// 4. The tree is borrowed for `'p`, so visitors may keep references into it.
pub trait ViewVisitor<'p> {
    fn visit_node(&mut self, node: &'p ViewNode, path: &NodePath) {
        walk_node(self, node, path);
    }

    fn visit_element(&mut self, element: &'p ElementNode, path: &NodePath) {
        walk_element(self, element, path);
    }

    fn visit_component(&mut self, component: &'p ComponentNode, path: &NodePath) {
        walk_component(self, component, path);
    }

    fn visit_slot(&mut self, _slot: &'p SlotNode, _path: &NodePath) {
        // Leaf node, nothing to walk
    }

    fn visit_text(&mut self, text: &'p TextNode, path: &NodePath) {
        walk_text(self, text, path);
    }

    fn visit_code(&mut self, code: &'p CodeNode, path: &NodePath) {
        walk_code(self, code, path);
    }

    fn visit_if(&mut self, node: &'p IfNode, path: &NodePath) {
        walk_if(self, node, path);
    }

    fn visit_each(&mut self, node: &'p EachNode, path: &NodePath) {
        walk_each(self, node, path);
    }

    /// `path` is the owning node's address; each prop lands at `props/<key>`.
    fn visit_props(&mut self, props: &'p IndexMap<String, PropValue>, path: &NodePath) {
        walk_props(self, props, path);
    }

    fn visit_event(&mut self, handler: &'p EventHandler, path: &NodePath) {
        walk_event(self, handler, path);
    }

    fn visit_expression(&mut self, expr: &'p Expression, path: &NodePath) {
        walk_expression(self, expr, path);
    }

    fn visit_step(&mut self, step: &'p ActionStep, path: &NodePath) {
        walk_step(self, step, path);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW WALKS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn walk_node<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    node: &'p ViewNode,
    path: &NodePath,
) {
    match node {
        ViewNode::Element(el) => visitor.visit_element(el, path),
        ViewNode::Text(t) => visitor.visit_text(t, path),
        ViewNode::If(n) => visitor.visit_if(n, path),
        ViewNode::Each(n) => visitor.visit_each(n, path),
        ViewNode::Component(c) => visitor.visit_component(c, path),
        ViewNode::Slot(s) => visitor.visit_slot(s, path),
        ViewNode::Code(c) => visitor.visit_code(c, path),
    }
}

pub fn walk_children<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    children: &'p [ViewNode],
    path: &NodePath,
) {
    for (i, child) in children.iter().enumerate() {
        visitor.visit_node(child, &path.indexed("children", i));
    }
}

pub fn walk_element<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    element: &'p ElementNode,
    path: &NodePath,
) {
    if let Some(props) = &element.props {
        visitor.visit_props(props, path);
    }
    walk_children(visitor, &element.children, path);
}

pub fn walk_component<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    component: &'p ComponentNode,
    path: &NodePath,
) {
    if let Some(props) = &component.props {
        visitor.visit_props(props, path);
    }
    walk_children(visitor, &component.children, path);
}

pub fn walk_text<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    text: &'p TextNode,
    path: &NodePath,
) {
    visitor.visit_expression(&text.value, &path.child("value"));
}

pub fn walk_code<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    code: &'p CodeNode,
    path: &NodePath,
) {
    visitor.visit_expression(&code.language, &path.child("language"));
    visitor.visit_expression(&code.content, &path.child("content"));
}

pub fn walk_if<'p, V: ViewVisitor<'p> + ?Sized>(visitor: &mut V, node: &'p IfNode, path: &NodePath) {
    visitor.visit_expression(&node.condition, &path.child("condition"));
    visitor.visit_node(&node.then_branch, &path.child("then"));
    if let Some(else_branch) = &node.else_branch {
        visitor.visit_node(else_branch, &path.child("else"));
    }
}

pub fn walk_each<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    node: &'p EachNode,
    path: &NodePath,
) {
    visitor.visit_expression(&node.items, &path.child("items"));
    if let Some(key) = &node.key {
        visitor.visit_expression(key, &path.child("key"));
    }
    visitor.visit_node(&node.body, &path.child("body"));
}

pub fn walk_props<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    props: &'p IndexMap<String, PropValue>,
    path: &NodePath,
) {
    for (key, value) in props {
        let prop_path = path.child("props").child(key);
        match value {
            PropValue::Event(handler) => visitor.visit_event(handler, &prop_path),
            PropValue::Expression(expr) => visitor.visit_expression(expr, &prop_path),
        }
    }
}

pub fn walk_event<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    handler: &'p EventHandler,
    path: &NodePath,
) {
    if let Some(payload) = &handler.payload {
        visitor.visit_expression(payload, &path.child("payload"));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSION & STEP WALKS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn walk_expression<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    expr: &'p Expression,
    path: &NodePath,
) {
    match expr {
        Expression::Lit { .. }
        | Expression::State { .. }
        | Expression::Var { .. }
        | Expression::Param { .. }
        | Expression::Import { .. }
        | Expression::Route { .. } => {}
        Expression::Bin { left, right, .. } => {
            visitor.visit_expression(left, &path.child("left"));
            visitor.visit_expression(right, &path.child("right"));
        }
        Expression::Not { operand } => visitor.visit_expression(operand, &path.child("operand")),
        Expression::Cond {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expression(condition, &path.child("if"));
            visitor.visit_expression(then_branch, &path.child("then"));
            visitor.visit_expression(else_branch, &path.child("else"));
        }
        Expression::Get { base, .. } => visitor.visit_expression(base, &path.child("base")),
        Expression::Index { base, key } => {
            visitor.visit_expression(base, &path.child("base"));
            visitor.visit_expression(key, &path.child("key"));
        }
        Expression::Concat { items } => {
            for (i, item) in items.iter().enumerate() {
                visitor.visit_expression(item, &path.indexed("items", i));
            }
        }
        Expression::Style { variants, .. } => {
            for (group, value) in variants.iter().flatten() {
                visitor.visit_expression(value, &path.child("variants").child(group));
            }
        }
    }
}

pub fn walk_steps<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    steps: &'p [ActionStep],
    path: &NodePath,
    field: &str,
) {
    for (i, step) in steps.iter().enumerate() {
        visitor.visit_step(step, &path.indexed(field, i));
    }
}

pub fn walk_step<'p, V: ViewVisitor<'p> + ?Sized>(
    visitor: &mut V,
    step: &'p ActionStep,
    path: &NodePath,
) {
    match step {
        ActionStep::Set { value, .. } => visitor.visit_expression(value, &path.child("value")),
        ActionStep::Update {
            value,
            index,
            delete_count,
            ..
        } => {
            if let Some(value) = value {
                visitor.visit_expression(value, &path.child("value"));
            }
            if let Some(index) = index {
                visitor.visit_expression(index, &path.child("index"));
            }
            if let Some(delete_count) = delete_count {
                visitor.visit_expression(delete_count, &path.child("deleteCount"));
            }
        }
        ActionStep::Fetch {
            url,
            body,
            on_success,
            on_error,
            ..
        } => {
            visitor.visit_expression(url, &path.child("url"));
            if let Some(body) = body {
                visitor.visit_expression(body, &path.child("body"));
            }
            walk_steps(visitor, on_success, path, "onSuccess");
            walk_steps(visitor, on_error, path, "onError");
        }
        ActionStep::Navigate { url } => visitor.visit_expression(url, &path.child("url")),
    }
}
