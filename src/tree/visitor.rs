//! Syntax-tree traversal that builds declaration nodes.
//!
//! Module, class and method definitions become nodes attached to the nearest
//! enclosing declaration. Everything else (conditionals, blocks, `class << self`,
//! calls) is transparent: its children are visited with the same parent.
//! Method bodies are leaves; nothing defined inside a method is recorded.

use crate::tree::extent::{Extent, SourceFile};
use crate::tree::node::{Node, NodeKind};
use std::sync::Arc;
use tracing::trace;

/// Walk `syntax` (a node of `file`'s tree) and attach every declaration found
/// to `parent`, in textual order.
pub fn traverse(syntax: tree_sitter::Node<'_>, file: &Arc<SourceFile>, parent: &mut Node) {
    match declaration_for(syntax, file) {
        Some(declaration) => {
            let kind = declaration.kind();
            let attached = parent.attach(declaration);
            if kind.is_container() {
                traverse_children(syntax, file, attached);
            }
        }
        None => traverse_children(syntax, file, parent),
    }
}

fn traverse_children(syntax: tree_sitter::Node<'_>, file: &Arc<SourceFile>, parent: &mut Node) {
    let mut cursor = syntax.walk();
    for child in syntax.named_children(&mut cursor) {
        traverse(child, file, parent);
    }
}

fn declaration_kind(syntax_kind: &str) -> Option<NodeKind> {
    match syntax_kind {
        "module" => Some(NodeKind::Module),
        "class" => Some(NodeKind::Class),
        "singleton_method" => Some(NodeKind::ClassMethod),
        "method" => Some(NodeKind::InstanceMethod),
        _ => None,
    }
}

fn declaration_for(syntax: tree_sitter::Node<'_>, file: &Arc<SourceFile>) -> Option<Node> {
    let kind = declaration_kind(syntax.kind())?;
    let Some(name) = declared_name(syntax, kind, file.text()) else {
        trace!(
            kind = %kind,
            line = syntax.start_position().row + 1,
            "declaration without a name, visiting as plain syntax"
        );
        return None;
    };
    Some(Node::declaration(
        kind,
        name,
        Extent::from_syntax_node(file, syntax),
    ))
}

/// `module A::B` and `class A::B` are named by their last constant; methods by
/// their identifier, operator or setter name as written.
fn declared_name(syntax: tree_sitter::Node<'_>, kind: NodeKind, source: &str) -> Option<String> {
    let mut name_node = syntax.child_by_field_name("name")?;
    if !kind.is_method() && name_node.kind() == "scope_resolution" {
        name_node = name_node.child_by_field_name("name")?;
    }

    let text = name_node.utf8_text(source.as_bytes()).ok()?;
    (!text.is_empty()).then(|| text.to_string())
}
