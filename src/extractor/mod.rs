//! Review text extraction.
//!
//! Works over one post-expansion snapshot of the page. [`Page`] indexes the
//! snapshot once (owner-reply blocks, tagged text by owning entry);
//! [`EntryView`] is one collected entry re-located in it by identifier.
//!
//! # Module Structure
//!
//! - `validity`: validity predicate and final cleanup shared by all strategies
//! - `strategies`: the four text strategies and the short-circuiting chain
//!
//! # Usage
//!
//! ```rust,ignore
//! let doc = dom::parse(&html);
//! let page = Page::new(&doc, &selectors);
//! for entry in &entries {
//!     if let Some(view) = page.entry(entry) {
//!         let result = extract_text(&view, &mut sink);
//!     }
//! }
//! ```

use std::collections::{HashMap, HashSet};

use dom_query::{Document, NodeId, NodeRef, Selection};

use crate::collector::EntryRef;
use crate::dom;
use crate::fields::tag_run_start;
use crate::options::Selectors;

pub mod strategies;
pub mod validity;

pub use strategies::{extract_text, StrategyOutcome};
pub use validity::{clean_final_text, is_valid_comment};

/// Index over a rendered snapshot, built once per run.
pub struct Page<'a> {
    pub document: &'a Document,
    pub selectors: &'a Selectors,
    owner_reply_ids: HashSet<NodeId>,
    /// First node carrying each identifier.
    entries_by_id: HashMap<String, NodeRef<'a>>,
    /// Tagged text nodes outside owner replies, keyed by the identifier of
    /// their nearest identified ancestor, in document order.
    tagged_by_entry: HashMap<String, Vec<NodeRef<'a>>>,
    /// Tagged nodes that are bucket labels or tag values, never review text.
    tag_run_ids: HashSet<NodeId>,
}

impl<'a> Page<'a> {
    #[must_use]
    pub fn new(document: &'a Document, selectors: &'a Selectors) -> Self {
        let root = document.select("html");
        let owner_reply_ids = dom::node_ids(&root, &selectors.owner_reply);

        // Identifiers are opaque page data; they are compared as attribute
        // values and never spliced into a selector.
        let mut entries_by_id: HashMap<String, NodeRef<'a>> = HashMap::new();
        let identified = format!("[{}]", selectors.entry_id_attr);
        for node in document.select(&identified).nodes() {
            if let Some(id) = node.attr(&selectors.entry_id_attr) {
                entries_by_id.entry(id.to_string()).or_insert(*node);
            }
        }

        let mut tagged_by_entry: HashMap<String, Vec<NodeRef<'a>>> = HashMap::new();
        for node in document.select(&selectors.tagged_text).nodes() {
            if dom::is_within(node, &owner_reply_ids) {
                continue;
            }
            let Some(owner) = dom::nearest_ancestor_with_attr(node, &selectors.entry_id_attr) else {
                continue;
            };
            if let Some(id) = owner.attr(&selectors.entry_id_attr) {
                tagged_by_entry.entry(id.to_string()).or_default().push(*node);
            }
        }

        let mut tag_run_ids = HashSet::new();
        for nodes in tagged_by_entry.values() {
            let texts = nodes.iter().map(|node| node.text().to_string());
            if let Some(start) = tag_run_start(texts) {
                tag_run_ids.extend(nodes[start..].iter().map(|node| node.id));
            }
        }

        Self {
            document,
            selectors,
            owner_reply_ids,
            entries_by_id,
            tagged_by_entry,
            tag_run_ids,
        }
    }

    /// Re-locate a collected entry: the first node carrying its identifier.
    #[must_use]
    pub fn entry(&'a self, entry: &'a EntryRef) -> Option<EntryView<'a>> {
        let node = *self.entries_by_id.get(&entry.id)?;
        Some(EntryView {
            page: self,
            id: &entry.id,
            index: entry.index,
            node,
        })
    }

    /// Whether `node` is, or lies under, an owner-reply block.
    #[must_use]
    pub fn in_owner_reply(&self, node: &NodeRef) -> bool {
        dom::is_within(node, &self.owner_reply_ids)
    }

    /// Whether `node` belongs to an entry's tag run.
    #[must_use]
    pub fn is_tag(&self, node: &NodeRef) -> bool {
        self.tag_run_ids.contains(&node.id)
    }

    /// Tagged text nodes owned by the entry `id`.
    #[must_use]
    pub fn owned_tagged(&self, id: &str) -> &[NodeRef<'a>] {
        self.tagged_by_entry.get(id).map_or(&[], Vec::as_slice)
    }
}

/// One collected entry inside the snapshot.
pub struct EntryView<'a> {
    pub page: &'a Page<'a>,
    pub id: &'a str,
    /// 0-based first-seen position.
    pub index: usize,
    pub node: NodeRef<'a>,
}

impl<'a> EntryView<'a> {
    #[must_use]
    pub fn selection(&self) -> Selection<'a> {
        Selection::from(self.node)
    }

    #[must_use]
    pub fn selectors(&self) -> &'a Selectors {
        self.page.selectors
    }

    /// First match of `selector` under the entry.
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<Selection<'a>> {
        let found = self.selection().select(selector);
        found.nodes().first().map(|node| Selection::from(*node))
    }

    /// Every match of `selector` under the entry, in document order.
    #[must_use]
    pub fn find_each(&self, selector: &str) -> Vec<Selection<'a>> {
        dom::select_each(&self.selection(), selector)
    }
}
