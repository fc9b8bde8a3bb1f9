//! DOM helpers over `dom_query`.
//!
//! Thin adapters used by the extractors when reading a rendered snapshot:
//! attribute and text reads, ancestor walks, and the "own text" of a node
//! (its direct text children only, not its descendants).

use std::collections::HashSet;

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

// === Text Content ===

/// Descendant text, trimmed, as an owned string.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// Text of the node's direct text children, joined and trimmed.
///
/// `<div>Great <b>food</b> here</div>` has own text `"Great  here"`.
#[must_use]
pub fn own_text(node: &NodeRef) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        }
    }
    out.trim().to_string()
}

// === Querying ===

/// Matches of `selector` under `sel`, as individual single-node selections.
#[must_use]
pub fn select_each<'a>(sel: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    sel.select(selector)
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect()
}

/// Node ids of every element matching `selector` under `sel`.
#[must_use]
pub fn node_ids(sel: &Selection, selector: &str) -> HashSet<NodeId> {
    sel.select(selector).nodes().iter().map(|n| n.id).collect()
}

// === Tree Navigation ===

/// Whether the node or any of its ancestors is in `ids`.
#[must_use]
pub fn is_within(node: &NodeRef, ids: &HashSet<NodeId>) -> bool {
    if ids.is_empty() {
        return false;
    }
    let mut current = Some(*node);
    while let Some(n) = current {
        if ids.contains(&n.id) {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Nearest strict ancestor carrying attribute `name`.
#[must_use]
pub fn nearest_ancestor_with_attr<'a>(node: &NodeRef<'a>, name: &str) -> Option<NodeRef<'a>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.is_element() && n.attr(name).is_some() {
            return Some(n);
        }
        current = n.parent();
    }
    None
}
