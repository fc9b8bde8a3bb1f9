//! Entry collector.
//!
//! Reads the identifier of every rendered entry and keeps the first entry for
//! each identifier, in document order. The resulting order is the order
//! records are numbered in.

use std::collections::HashSet;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::document::RenderableDocument;
use crate::error::Result;
use crate::options::Selectors;

/// A collected entry: its identifier and first-seen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// 0-based position among unique entries.
    pub index: usize,
    pub id: String,
}

/// Unique entries in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    entries: Vec<EntryRef>,
    seen: HashSet<String>,
}

impl EntryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` unless already present. Returns whether it was new.
    pub fn insert(&mut self, id: String) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.entries.push(EntryRef {
            index: self.entries.len(),
            id,
        });
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryRef> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a EntryMap {
    type Item = &'a EntryRef;
    type IntoIter = std::slice::Iter<'a, EntryRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Collect every rendered entry, de-duplicated by identifier.
///
/// Entries whose identifier cannot be read are skipped and reported; later
/// duplicates of a collected identifier are skipped and reported.
pub fn collect<D>(
    document: &mut D,
    selectors: &Selectors,
    sink: &mut dyn DiagnosticSink,
) -> Result<EntryMap>
where
    D: RenderableDocument + ?Sized,
{
    let nodes = document.find_all(&selectors.entry)?;
    let mut entries = EntryMap::new();

    for (position, node) in nodes.iter().enumerate() {
        let id = match document.attribute(node, &selectors.entry_id_attr) {
            Ok(Some(id)) if !id.trim().is_empty() => id,
            Ok(_) => {
                sink.on_diagnostic("", &DiagnosticEvent::IdentifierUnreadable { position });
                continue;
            }
            Err(e) => {
                tracing::debug!(position, error = %e, "entry identifier read failed");
                sink.on_diagnostic("", &DiagnosticEvent::IdentifierUnreadable { position });
                continue;
            }
        };

        if !entries.insert(id.clone()) {
            sink.on_diagnostic(&id, &DiagnosticEvent::DuplicateEntry);
        }
    }

    tracing::info!(rendered = nodes.len(), unique = entries.len(), "entries collected");
    Ok(entries)
}
