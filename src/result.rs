//! Result types for harvest output.
//!
//! [`Record`] is the exported unit; [`ExtractionResult`] is the transient
//! outcome of the text strategy chain; [`Harvest`] wraps one run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::listing::ListingName;

/// Which text strategy produced a review's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Dedicated review-text span.
    Primary,
    /// Tagged text nodes owned by the entry, scanned document-wide.
    TaggedScan,
    /// Own text of every node in the entry, noise-filtered.
    StructuralScan,
    /// Tagged text inside the narrow review-text subtree.
    NarrowFallback,
    /// Nothing valid was found.
    #[default]
    None,
}

impl Strategy {
    /// Short stable name used in diagnostics and exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::TaggedScan => "tagged_scan",
            Self::StructuralScan => "structural",
            Self::NarrowFallback => "narrow",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the text strategy chain for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Accepted text after final cleanup; empty when nothing was valid.
    pub text: String,
    pub strategy: Strategy,
    /// Whether any strategy passed the validity predicate.
    pub valid: bool,
}

impl ExtractionResult {
    /// Result for an entry where every strategy failed.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Tags grouped by the label that preceded them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBuckets {
    pub services: Vec<String>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub price: Vec<String>,
}

/// One exported review.
///
/// Created once per unique entry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Run-local identifier (`R001`, `R002`, ...), assigned in collection order.
    pub uid: String,
    /// Page-assigned identifier of the source entry.
    pub entry_id: String,
    pub reviewer: String,
    /// Accessible label of the rating control, verbatim.
    pub rating_label: String,
    /// Star rating, always within 1..=5.
    pub rating_value: u8,
    pub date_raw: String,
    /// Approximate absolute date (week = 7, month = 30, year = 365 days).
    pub date_parsed: Option<NaiveDate>,
    pub date_parse_success: bool,
    pub review_text: String,
    /// Strategy that produced `review_text`.
    pub text_strategy: Strategy,
    pub image_count: usize,
    /// Stored image file names.
    pub image_refs: Vec<String>,
    pub like_count: u32,
    pub services: Vec<String>,
    pub positive_tags: Vec<String>,
    pub negative_tags: Vec<String>,
    pub price_tags: Vec<String>,
    pub owner_responded: bool,
}

/// Output of one harvest run.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    /// Records in first-seen order.
    pub records: Vec<Record>,
    /// Scroll rounds the loader used.
    pub attempts_used: usize,
    /// Unique entries collected (entries without a rating produce no record).
    pub entries_collected: usize,
    /// Listing name derived from the URL, when one was given.
    pub listing: Option<ListingName>,
}

impl Harvest {
    /// The explicit "no data" signal: nothing was collected or assembled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
